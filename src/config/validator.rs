use serde::Serialize;

use super::{
    PlatformConfig, DISCORD_BOT_TOKEN_PLACEHOLDER, DISCORD_WEBHOOK_URL_PLACEHOLDER,
    INSTAGRAM_ACCESS_TOKEN_PLACEHOLDER, INSTAGRAM_USER_ID_PLACEHOLDER,
    MIN_INSTAGRAM_TOKEN_LEN, TWITCH_CLIENT_ID_PLACEHOLDER, TWITCH_CLIENT_SECRET_PLACEHOLDER,
    TWITCH_USERNAME_PLACEHOLDER,
};
use crate::agent::Platform;

const DISCORD_WEBHOOK_PREFIX: &str = "https://discord.com/api/webhooks/";

/// Credential check result for one platform
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub platform: Platform,
    /// Whether every credential looks real
    pub is_valid: bool,
    /// What is missing or malformed
    pub errors: Vec<String>,
    /// How to fix each error
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    pub fn ok(platform: Platform) -> Self {
        Self {
            platform,
            is_valid: true,
            errors: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_error(mut self, msg: impl Into<String>, suggestion: impl Into<String>) -> Self {
        self.is_valid = false;
        self.errors.push(msg.into());
        self.suggestions.push(suggestion.into());
        self
    }
}

/// Overall configuration status
#[derive(Debug, Clone, Serialize)]
pub struct ConfigStatus {
    pub total_platforms: usize,
    pub configured_platforms: usize,
    pub results: Vec<ValidationResult>,
}

impl PlatformConfig {
    pub fn validate_twitch(&self) -> ValidationResult {
        let twitch = &self.twitch;
        let mut result = ValidationResult::ok(Platform::Twitch);

        if twitch.client_id == TWITCH_CLIENT_ID_PLACEHOLDER {
            result = result.with_error(
                "Twitch Client ID not configured",
                "Get Client ID from https://dev.twitch.tv/console",
            );
        }
        if twitch.client_secret == TWITCH_CLIENT_SECRET_PLACEHOLDER {
            result = result.with_error(
                "Twitch Client Secret not configured",
                "Generate Client Secret in Twitch Developer Console",
            );
        }
        if twitch.username == TWITCH_USERNAME_PLACEHOLDER {
            result = result.with_error(
                "Twitch username not configured",
                "Set your actual Twitch channel username",
            );
        }
        result
    }

    pub fn validate_discord(&self) -> ValidationResult {
        let discord = &self.discord;
        let mut result = ValidationResult::ok(Platform::Discord);

        if discord.webhook_url == DISCORD_WEBHOOK_URL_PLACEHOLDER {
            result = result.with_error(
                "Discord webhook URL not configured",
                "Create webhook in Discord server settings > Integrations",
            );
        } else if !discord.webhook_url.starts_with(DISCORD_WEBHOOK_PREFIX) {
            result = result.with_error(
                "Invalid Discord webhook URL format",
                format!("Webhook URL should start with '{}'", DISCORD_WEBHOOK_PREFIX),
            );
        }
        if discord.bot_token == DISCORD_BOT_TOKEN_PLACEHOLDER {
            result = result.with_error(
                "Discord bot token not configured",
                "Create bot at https://discord.com/developers/applications",
            );
        }
        result
    }

    pub fn validate_instagram(&self) -> ValidationResult {
        let instagram = &self.instagram;
        let mut result = ValidationResult::ok(Platform::Instagram);

        if instagram.access_token == INSTAGRAM_ACCESS_TOKEN_PLACEHOLDER {
            result = result.with_error(
                "Instagram access token not configured",
                "Get token from Instagram Basic Display API or Graph API",
            );
        } else if instagram.access_token.len() < MIN_INSTAGRAM_TOKEN_LEN {
            result = result.with_error(
                "Instagram access token appears invalid",
                "Ensure you're using a valid long-lived access token",
            );
        }
        if instagram.user_id == INSTAGRAM_USER_ID_PLACEHOLDER {
            result = result.with_error(
                "Instagram user ID not configured",
                "Get your Instagram user ID from the API response",
            );
        }
        result
    }

    /// Validate all platforms, in display order
    pub fn status(&self) -> ConfigStatus {
        let results = vec![
            self.validate_twitch(),
            self.validate_discord(),
            self.validate_instagram(),
        ];
        let configured_platforms = results.iter().filter(|r| r.is_valid).count();

        ConfigStatus {
            total_platforms: Platform::ALL.len(),
            configured_platforms,
            results,
        }
    }
}
