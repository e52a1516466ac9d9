use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::Platform;

/// Confidence assigned to any rule match
pub const MATCH_CONFIDENCE: f32 = 0.9;
/// Confidence assigned when no rule matches
pub const UNKNOWN_CONFIDENCE: f32 = 0.1;

pub const PARAM_CUSTOM_MESSAGE: &str = "custom_message";
pub const PARAM_STORY_TEXT: &str = "story_text";
pub const PARAM_ORIGINAL_TEXT: &str = "original_text";

/// One submitted command
#[derive(Debug, Clone)]
pub struct CommandInput {
    /// Correlation id for logs
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl CommandInput {
    pub fn new(text: impl Into<String>) -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("cmd-{}", &uuid[..8]),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Action tag of an intent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CheckStream,
    NotifyLive,
    GetLatestReel,
    NotifyReel,
    PostLiveStory,
    ShowHelp,
    Unknown,
    /// Tag from a user-defined rule with no built-in handler
    #[serde(untagged)]
    Other(String),
}

impl Action {
    /// Parse a tag, mapping built-in names to their variants
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "check_stream" => Self::CheckStream,
            "notify_live" => Self::NotifyLive,
            "get_latest_reel" => Self::GetLatestReel,
            "notify_reel" => Self::NotifyReel,
            "post_live_story" => Self::PostLiveStory,
            "show_help" => Self::ShowHelp,
            "unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::CheckStream => "check_stream",
            Self::NotifyLive => "notify_live",
            Self::GetLatestReel => "get_latest_reel",
            Self::NotifyReel => "notify_reel",
            Self::PostLiveStory => "post_live_story",
            Self::ShowHelp => "show_help",
            Self::Unknown => "unknown",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured interpretation of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandIntent {
    pub action: Action,
    /// Target platforms, in rule order
    pub platform: Vec<Platform>,
    pub parameters: HashMap<String, String>,
    pub confidence: f32,
}

impl CommandIntent {
    pub fn unknown(text: &str) -> Self {
        let mut parameters = HashMap::new();
        parameters.insert(PARAM_ORIGINAL_TEXT.to_string(), text.to_string());
        Self {
            action: Action::Unknown,
            platform: Vec::new(),
            parameters,
            confidence: UNKNOWN_CONFIDENCE,
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(|s| s.as_str())
    }
}
