use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{AgentError, AgentResponse, MessageData, Platform, ResponseData};
use crate::config::AppConfig;

const ACTION_SEND_MESSAGE: &str = "send_message";

const BOT_NAME: &str = "Multi-Agent Bot";
const BOT_AVATAR: &str = "https://via.placeholder.com/64x64/5865f2/ffffff?text=🤖";

const HELP_TEXT: &str = "🤖 **Multi-Agent Bot Commands** 🤖

Available commands:
• `Check if Twitch stream is live` - Get current stream status
• `Notify Discord that I'm live on Twitch` - Send live notification
• `Show the last Instagram reel` - Get latest reel info
• `Send the last reel to Discord` - Share reel in Discord
• `Post story: \"Going live now\"` - Create Instagram story
• `Show help` - Display this help message

💡 **Tips:**
- Commands are flexible - try natural language!
- Add custom messages with quotes: say \"Hello everyone!\"
- Mix and match platform actions";

#[derive(Serialize)]
struct WebhookRequest<'a> {
    content: &'a str,
    username: &'a str,
    avatar_url: &'a str,
}

#[derive(Deserialize)]
struct WebhookMessage {
    id: String,
}

/// Messaging agent (Discord webhook)
pub struct DiscordAgent {
    client: Client,
    config: Arc<AppConfig>,
}

impl DiscordAgent {
    pub fn new(client: Client, config: Arc<AppConfig>) -> Self {
        Self { client, config }
    }

    /// Send `custom_message` if given, otherwise `content`
    pub async fn send_message(&self, content: &str, custom_message: Option<&str>) -> AgentResponse {
        let message = custom_message.filter(|m| !m.is_empty()).unwrap_or(content);
        let discord = &self.config.platforms.discord;

        let mut message_id = None;
        if discord.has_webhook() {
            match self.post_webhook(message).await {
                Ok(id) => {
                    info!("Message delivered through Discord webhook");
                    message_id = id;
                }
                Err(e) if self.config.fallback_to_mock => {
                    warn!(error = %e, "Discord webhook failed, using mock delivery");
                }
                Err(e) => {
                    return AgentResponse::error(
                        Platform::Discord,
                        ACTION_SEND_MESSAGE,
                        format!("Failed to send Discord message: {}", e),
                    );
                }
            }
        }

        let data = MessageData {
            content: message.to_string(),
            channel_id: discord.channel_id.clone(),
            message_id: Some(
                message_id.unwrap_or_else(|| format!("msg_{}", Utc::now().timestamp_millis())),
            ),
            sent: true,
        };

        AgentResponse::success(
            Platform::Discord,
            ACTION_SEND_MESSAGE,
            format!("Message sent to Discord: \"{}\"", message),
        )
        .with_data(ResponseData::Message(data))
    }

    pub async fn notify_stream_live(
        &self,
        stream_title: &str,
        stream_url: &str,
        custom_message: Option<&str>,
    ) -> AgentResponse {
        let default_message = format!(
            "🔴 **LIVE NOW!** 🔴\n\n**{}**\n\nCome watch: {}",
            stream_title, stream_url
        );
        self.send_message(&default_message, custom_message).await
    }

    pub async fn share_media_item(
        &self,
        media_url: &str,
        caption: &str,
        custom_message: Option<&str>,
    ) -> AgentResponse {
        let default_message = format!(
            "📱 **New Instagram Reel!** 📱\n\n{}\n\nCheck it out: {}",
            caption, media_url
        );
        self.send_message(&default_message, custom_message).await
    }

    pub async fn show_help(&self) -> AgentResponse {
        self.send_message(HELP_TEXT, None).await
    }

    /// Returns the created message id when Discord echoes one back
    async fn post_webhook(&self, message: &str) -> Result<Option<String>, AgentError> {
        let body = WebhookRequest {
            content: message,
            username: BOT_NAME,
            avatar_url: BOT_AVATAR,
        };

        let response = self
            .client
            .post(&self.config.platforms.discord.webhook_url)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AgentError::Status {
                platform: Platform::Discord,
                code: response.status().as_u16(),
            });
        }

        // 204 without `?wait=true`, so a missing body is normal
        Ok(response.json::<WebhookMessage>().await.ok().map(|m| m.id))
    }
}
