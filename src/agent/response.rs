use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// External platform an agent talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitch,
    Discord,
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Twitch, Platform::Discord, Platform::Instagram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitch => "twitch",
            Self::Discord => "discord",
            Self::Instagram => "instagram",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Twitch => "Twitch",
            Self::Discord => "Discord",
            Self::Instagram => "Instagram",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Twitch => "📺",
            Self::Discord => "💬",
            Self::Instagram => "📸",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    #[allow(dead_code)]
    Pending,
}

impl ResponseStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Error => "❌",
            Self::Pending => "⏳",
        }
    }
}

/// Stream status payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamData {
    pub is_live: bool,
    pub title: String,
    pub game: String,
    pub viewer_count: u32,
    pub url: String,
    pub thumbnail_url: String,
}

/// Sent message payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    pub content: String,
    pub channel_id: String,
    pub message_id: Option<String>,
    pub sent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Image,
    Video,
    CarouselAlbum,
}

/// Media item payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaData {
    pub id: String,
    pub media_type: MediaType,
    pub media_url: String,
    pub caption: String,
    pub permalink: String,
    pub timestamp: String,
}

/// Posted story payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryData {
    pub id: String,
    pub text: String,
    pub posted: bool,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Stream(StreamData),
    Message(MessageData),
    Media(MediaData),
    Story(StoryData),
}

const ACTION_SYSTEM_ERROR: &str = "system_error";

/// Result of one agent operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub platform: Platform,
    pub status: ResponseStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl AgentResponse {
    pub fn success(platform: Platform, action: &str, message: impl Into<String>) -> Self {
        Self {
            platform,
            status: ResponseStatus::Success,
            message: message.into(),
            data: None,
            timestamp: Utc::now(),
            action: Some(action.to_string()),
        }
    }

    pub fn error(platform: Platform, action: &str, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            ..Self::success(platform, action, message)
        }
    }

    /// Failure outside any single agent
    pub fn system_error(message: impl std::fmt::Display) -> Self {
        Self::error(
            Platform::Discord,
            ACTION_SYSTEM_ERROR,
            format!("System error: {}", message),
        )
    }

    pub fn with_data(mut self, data: ResponseData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    pub fn stream_data(&self) -> Option<&StreamData> {
        match &self.data {
            Some(ResponseData::Stream(stream)) => Some(stream),
            _ => None,
        }
    }

    pub fn media_data(&self) -> Option<&MediaData> {
        match &self.data {
            Some(ResponseData::Media(media)) => Some(media),
            _ => None,
        }
    }
}

/// Failure inside an agent's real API path.
///
/// Never leaves the agent: each operation turns it into a mock fallback
/// or an error response.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{platform} API error: {code}")]
    Status { platform: Platform, code: u16 },

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("No video content found")]
    NoVideoContent,

    #[error("state store error: {0}")]
    Store(String),
}
