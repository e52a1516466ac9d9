mod validator;

pub use validator::ConfigStatus;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::agent::Platform;

pub const TWITCH_CLIENT_ID_PLACEHOLDER: &str = "your_twitch_client_id";
pub const TWITCH_CLIENT_SECRET_PLACEHOLDER: &str = "your_twitch_client_secret";
pub const TWITCH_USERNAME_PLACEHOLDER: &str = "your_twitch_username";
pub const TWITCH_CHANNEL_ID_PLACEHOLDER: &str = "your_twitch_channel_id";
pub const DISCORD_BOT_TOKEN_PLACEHOLDER: &str = "your_discord_bot_token";
pub const DISCORD_WEBHOOK_URL_PLACEHOLDER: &str = "your_discord_webhook_url";
pub const DISCORD_CHANNEL_ID_PLACEHOLDER: &str = "your_discord_channel_id";
pub const DISCORD_GUILD_ID_PLACEHOLDER: &str = "your_discord_guild_id";
pub const INSTAGRAM_ACCESS_TOKEN_PLACEHOLDER: &str = "your_instagram_access_token";
pub const INSTAGRAM_USER_ID_PLACEHOLDER: &str = "your_instagram_user_id";

/// Tokens shorter than this fail validation. The agent only calls the API
/// with tokens strictly longer.
const MIN_INSTAGRAM_TOKEN_LEN: usize = 20;

const CONFIG_FILE: &str = "config.json";

/// Twitch credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitchConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub channel_id: String,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            client_id: TWITCH_CLIENT_ID_PLACEHOLDER.into(),
            client_secret: TWITCH_CLIENT_SECRET_PLACEHOLDER.into(),
            username: TWITCH_USERNAME_PLACEHOLDER.into(),
            channel_id: TWITCH_CHANNEL_ID_PLACEHOLDER.into(),
        }
    }
}

impl TwitchConfig {
    /// Whether the Helix API can be called instead of generating mock data
    pub fn has_real_credentials(&self) -> bool {
        self.client_id != TWITCH_CLIENT_ID_PLACEHOLDER
            && self.client_secret != TWITCH_CLIENT_SECRET_PLACEHOLDER
    }
}

/// Discord credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub bot_token: String,
    pub webhook_url: String,
    pub channel_id: String,
    pub guild_id: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: DISCORD_BOT_TOKEN_PLACEHOLDER.into(),
            webhook_url: DISCORD_WEBHOOK_URL_PLACEHOLDER.into(),
            channel_id: DISCORD_CHANNEL_ID_PLACEHOLDER.into(),
            guild_id: DISCORD_GUILD_ID_PLACEHOLDER.into(),
        }
    }
}

impl DiscordConfig {
    /// Whether messages go out through the webhook
    pub fn has_webhook(&self) -> bool {
        self.webhook_url != DISCORD_WEBHOOK_URL_PLACEHOLDER && !self.webhook_url.is_empty()
    }
}

/// Instagram credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstagramConfig {
    pub access_token: String,
    pub user_id: String,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            access_token: INSTAGRAM_ACCESS_TOKEN_PLACEHOLDER.into(),
            user_id: INSTAGRAM_USER_ID_PLACEHOLDER.into(),
        }
    }
}

impl InstagramConfig {
    pub fn has_real_token(&self) -> bool {
        self.access_token != INSTAGRAM_ACCESS_TOKEN_PLACEHOLDER
            && self.access_token.len() > MIN_INSTAGRAM_TOKEN_LEN
    }
}

/// Credential bundle for all platforms
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub twitch: TwitchConfig,
    pub discord: DiscordConfig,
    pub instagram: InstagramConfig,
}

/// API base URLs (overridable for self-hosted proxies and tests)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub twitch_streams: String,
    pub twitch_oauth: String,
    pub instagram_media: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            twitch_streams: "https://api.twitch.tv/helix/streams".into(),
            twitch_oauth: "https://id.twitch.tv/oauth2/token".into(),
            instagram_media: "https://graph.instagram.com/me/media".into(),
        }
    }
}

/// Knobs for the mock path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Chance that the mock stream reports live
    pub live_probability: f64,
    /// Chance that a content check finds something new
    pub new_content_probability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            live_probability: 0.7,
            new_content_probability: 0.3,
        }
    }
}

/// Additional classifier rule, checked after the built-in rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub action: String,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub platforms: PlatformConfig,
    pub endpoints: Endpoints,
    pub simulation: SimulationConfig,
    /// Degrade to mock data when a real API call fails
    pub fallback_to_mock: bool,
    pub request_timeout_secs: u64,
    pub command_timeout_secs: u64,
    pub rules: Vec<RuleSpec>,
    /// Named command batches
    pub workflows: HashMap<String, Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut workflows = HashMap::new();
        workflows.insert(
            "go-live".into(),
            vec![
                "Check if Twitch stream is live".into(),
                "Notify Discord that I'm live on Twitch".into(),
                "Post story: \"Going live now\"".into(),
            ],
        );

        Self {
            platforms: PlatformConfig::default(),
            endpoints: Endpoints::default(),
            simulation: SimulationConfig::default(),
            fallback_to_mock: true,
            request_timeout_secs: 10,
            command_timeout_secs: 30,
            rules: Vec::new(),
            workflows,
        }
    }
}

impl AppConfig {
    /// Load from `config.json` in the data dir, or defaults if absent
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read {}", config_path.display()))?;
        serde_json::from_str(&content)
            .context(format!("Failed to parse {}", config_path.display()))
    }

    /// Write the config to `config.json`, creating the data dir if needed
    pub fn save(&self, data_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(data_dir)
            .context(format!("Failed to create {}", data_dir.display()))?;
        let config_path = data_dir.join(CONFIG_FILE);
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .context(format!("Failed to write {}", config_path.display()))?;
        Ok(config_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Names of the configured workflows, sorted
    pub fn workflow_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.workflows.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn get_workflow(&self, name: &str) -> Option<&[String]> {
        self.workflows.get(name).map(|w| w.as_slice())
    }
}

/// Pick the data dir: explicit flag, then `./.streamdesk`, then the user config dir
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    let local = PathBuf::from(".streamdesk");
    if local.exists() {
        return local;
    }
    dirs::config_dir()
        .map(|d| d.join("streamdesk"))
        .unwrap_or(local)
}
