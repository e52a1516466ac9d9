use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use super::{AgentResponse, DiscordAgent, InstagramAgent, Platform, TwitchAgent};
use crate::command::{
    Action, CommandInput, CommandIntent, CommandRouter, DEFAULT_STORY_TEXT, PARAM_CUSTOM_MESSAGE,
    PARAM_STORY_TEXT,
};
use crate::config::AppConfig;
use crate::state::KeyValueStore;

/// Routes one command to the agents and collects their responses
pub struct Orchestrator {
    router: CommandRouter,
    twitch: TwitchAgent,
    discord: DiscordAgent,
    instagram: InstagramAgent,
    command_timeout: Duration,
}

impl Orchestrator {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;
        let router = CommandRouter::with_rules(&config.rules)?;

        Ok(Self {
            router,
            twitch: TwitchAgent::new(client.clone(), Arc::clone(&config)),
            discord: DiscordAgent::new(client.clone(), Arc::clone(&config)),
            instagram: InstagramAgent::new(client, Arc::clone(&config), store),
            command_timeout: config.command_timeout(),
        })
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    pub fn twitch(&self) -> &TwitchAgent {
        &self.twitch
    }

    pub fn instagram(&self) -> &InstagramAgent {
        &self.instagram
    }

    /// Classify and execute one command. Never fails: every problem is
    /// reported as an error response.
    pub async fn process_command(&self, input: &CommandInput) -> Vec<AgentResponse> {
        let intent = self.router.parse_command(&input.text);
        info!(
            command_id = %input.id,
            submitted_at = %input.timestamp,
            action = %intent.action,
            confidence = intent.confidence,
            "Processing command"
        );

        match tokio::time::timeout(self.command_timeout, self.dispatch(input, &intent)).await {
            Ok(responses) => responses,
            Err(_) => {
                warn!(command_id = %input.id, "Command timed out");
                vec![AgentResponse::system_error(format!(
                    "command timed out after {}s",
                    self.command_timeout.as_secs()
                ))]
            }
        }
    }

    async fn dispatch(&self, input: &CommandInput, intent: &CommandIntent) -> Vec<AgentResponse> {
        match &intent.action {
            Action::Unknown => vec![AgentResponse::error(
                Platform::Discord,
                Action::Unknown.as_str(),
                format!(
                    "Unknown command: \"{}\". Type \"help\" to see available commands.",
                    input.text
                ),
            )],
            Action::CheckStream => vec![self.twitch.check_stream_status().await],
            Action::NotifyLive => self.notify_live(intent).await,
            Action::GetLatestReel => vec![self.instagram.get_latest_item().await],
            Action::NotifyReel => self.notify_reel(intent).await,
            Action::PostLiveStory => {
                let text = intent.param(PARAM_STORY_TEXT).unwrap_or(DEFAULT_STORY_TEXT);
                vec![self.instagram.post_story(text).await]
            }
            Action::ShowHelp => vec![self.discord.show_help().await],
            Action::Other(tag) => vec![AgentResponse::error(
                Platform::Discord,
                tag,
                format!("Action \"{}\" not implemented yet.", tag),
            )],
        }
    }

    /// Announce the stream, but only while it is live
    async fn notify_live(&self, intent: &CommandIntent) -> Vec<AgentResponse> {
        let status = self.twitch.check_stream_status().await;
        if !status.is_success() {
            warn!(message = %status.message, "Stream status unknown, not notifying");
            return vec![status];
        }

        let Some(stream) = status.stream_data().filter(|s| s.is_live).cloned() else {
            info!("Skipping live notification, stream is offline");
            return vec![AgentResponse::error(
                Platform::Twitch,
                Action::NotifyLive.as_str(),
                "Cannot notify - stream is not currently live",
            )];
        };

        let title = if stream.title.is_empty() {
            "Live Stream"
        } else {
            stream.title.as_str()
        };
        let notification = self
            .discord
            .notify_stream_live(title, &stream.url, intent.param(PARAM_CUSTOM_MESSAGE))
            .await;

        vec![status, notification]
    }

    /// Fetch the latest media item and share it if the fetch succeeded
    async fn notify_reel(&self, intent: &CommandIntent) -> Vec<AgentResponse> {
        let fetched = self.instagram.get_latest_item().await;
        let media = fetched
            .media_data()
            .filter(|_| fetched.is_success())
            .cloned();

        let mut responses = vec![fetched];
        if let Some(media) = media {
            responses.push(
                self.discord
                    .share_media_item(
                        &media.permalink,
                        &media.caption,
                        intent.param(PARAM_CUSTOM_MESSAGE),
                    )
                    .await,
            );
        }
        responses
    }
}
