use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{
    chance, AgentError, AgentResponse, MediaData, MediaType, Platform, ResponseData, StoryData,
};
use crate::config::AppConfig;
use crate::state::KeyValueStore;

const ACTION_GET_LATEST_REEL: &str = "get_latest_reel";
const ACTION_POST_STORY: &str = "post_story";
const ACTION_CHECK_NEW_CONTENT: &str = "check_new_content";

/// Store key for the time of the last content check that found something
pub const LAST_CHECK_KEY: &str = "last_instagram_check";

const MEDIA_FIELDS: &str = "id,media_type,media_url,caption,permalink,timestamp";

const MOCK_MEDIA_URL: &str =
    "https://via.placeholder.com/400x600/e4405f/ffffff?text=Demo+Instagram+Reel";
const MOCK_CAPTION: &str = "Just posted a new coding tutorial! 🚀 Building amazing projects \
with Rust and async. What do you think? #coding #rust #demo";
const MOCK_STORY_URL: &str = "https://instagram.com/stories/mock-story-id";

#[derive(Debug, Deserialize)]
struct MediaListResponse {
    #[serde(default)]
    data: Vec<GraphMedia>,
}

#[derive(Debug, Deserialize)]
struct GraphMedia {
    id: Option<String>,
    media_type: Option<MediaType>,
    media_url: Option<String>,
    caption: Option<String>,
    permalink: Option<String>,
    timestamp: Option<String>,
}

/// Media agent (Instagram Graph API)
pub struct InstagramAgent {
    client: Client,
    config: Arc<AppConfig>,
    store: Arc<dyn KeyValueStore>,
}

impl InstagramAgent {
    pub fn new(client: Client, config: Arc<AppConfig>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client,
            config,
            store,
        }
    }

    /// Most recent video item
    pub async fn get_latest_item(&self) -> AgentResponse {
        let media = if self.config.platforms.instagram.has_real_token() {
            match self.fetch_latest_video().await {
                Ok(media) => media,
                Err(e) if self.config.fallback_to_mock => {
                    warn!(error = %e, "Instagram API failed, using mock data");
                    Self::mock_media()
                }
                Err(e) => {
                    return AgentResponse::error(
                        Platform::Instagram,
                        ACTION_GET_LATEST_REEL,
                        format!("Failed to get latest reel: {}", e),
                    );
                }
            }
        } else {
            Self::mock_media()
        };

        AgentResponse::success(
            Platform::Instagram,
            ACTION_GET_LATEST_REEL,
            "Latest reel retrieved successfully",
        )
        .with_data(ResponseData::Media(media))
    }

    /// Publishing stories is not exposed by the Graph API for personal
    /// accounts, so this is always simulated.
    pub async fn post_story(&self, text: &str) -> AgentResponse {
        let story = StoryData {
            id: format!("story_{}", Utc::now().timestamp_millis()),
            text: text.to_string(),
            posted: true,
            url: MOCK_STORY_URL.into(),
        };

        AgentResponse::success(
            Platform::Instagram,
            ACTION_POST_STORY,
            format!("Story posted: \"{}\"", text),
        )
        .with_data(ResponseData::Story(story))
    }

    /// Look for content newer than the last check
    pub async fn check_for_new_content(&self) -> AgentResponse {
        match self.try_check_for_new_content().await {
            Ok(response) => response,
            Err(e) => AgentResponse::error(
                Platform::Instagram,
                ACTION_CHECK_NEW_CONTENT,
                format!("Failed to check for new content: {}", e),
            ),
        }
    }

    async fn try_check_for_new_content(&self) -> Result<AgentResponse, AgentError> {
        let last_check = self
            .store
            .get(LAST_CHECK_KEY)
            .map_err(|e| AgentError::Store(e.to_string()))?;
        debug!(last_check = ?last_check, "Checking for new Instagram content");

        let checked_at = Utc::now().to_rfc3339();
        if !chance(self.config.simulation.new_content_probability) {
            return Ok(AgentResponse::success(
                Platform::Instagram,
                ACTION_CHECK_NEW_CONTENT,
                "No new content since last check",
            ));
        }

        let latest = self.get_latest_item().await;
        if !latest.is_success() {
            // Keep the old marker so the next check looks again
            warn!(message = %latest.message, "New content check could not fetch media");
            return Ok(latest);
        }
        self.store
            .set(LAST_CHECK_KEY, &checked_at)
            .map_err(|e| AgentError::Store(e.to_string()))?;
        info!("New Instagram content found");
        Ok(latest)
    }

    fn mock_media() -> MediaData {
        let now = Utc::now();
        let millis = now.timestamp_millis();
        MediaData {
            id: format!("demo_reel_{}", millis),
            media_type: MediaType::Video,
            media_url: MOCK_MEDIA_URL.into(),
            caption: MOCK_CAPTION.into(),
            permalink: format!("https://instagram.com/p/demo-reel-{}", millis),
            timestamp: now.to_rfc3339(),
        }
    }

    async fn fetch_latest_video(&self) -> Result<MediaData, AgentError> {
        let response = self
            .client
            .get(&self.config.endpoints.instagram_media)
            .query(&[
                ("fields", MEDIA_FIELDS),
                ("access_token", self.config.platforms.instagram.access_token.as_str()),
                ("limit", "10"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AgentError::Status {
                platform: Platform::Instagram,
                code: response.status().as_u16(),
            });
        }

        let body: MediaListResponse = response.json().await?;
        let video = body
            .data
            .into_iter()
            .find(|m| m.media_type == Some(MediaType::Video))
            .ok_or(AgentError::NoVideoContent)?;

        Ok(MediaData {
            id: video.id.ok_or(AgentError::MissingField("id"))?,
            media_type: MediaType::Video,
            media_url: video.media_url.unwrap_or_default(),
            caption: video
                .caption
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "No caption".into()),
            permalink: video.permalink.ok_or(AgentError::MissingField("permalink"))?,
            timestamp: video.timestamp.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::{config, real_instagram};
    use crate::agent::ResponseStatus;
    use crate::state::MemoryStore;
    use anyhow::anyhow;
    use mockito::{Matcher, Server};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }

        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    fn agent_with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> InstagramAgent {
        InstagramAgent::new(Client::new(), Arc::new(config), store)
    }

    fn agent(config: AppConfig) -> InstagramAgent {
        agent_with_store(config, Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_mock_latest_item() {
        let response = agent(config(0.0, 0.0)).get_latest_item().await;
        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.action.as_deref(), Some("get_latest_reel"));

        let media = response.media_data().unwrap();
        assert_eq!(media.media_type, MediaType::Video);
        assert!(media.id.starts_with("demo_reel_"));
        assert!(media.permalink.starts_with("https://instagram.com/p/demo-reel-"));
        assert_eq!(media.caption, MOCK_CAPTION);
    }

    #[tokio::test]
    async fn test_post_story() {
        let response = agent(config(0.0, 0.0)).post_story("Going live now").await;
        assert_eq!(response.message, "Story posted: \"Going live now\"");
        assert_eq!(response.action.as_deref(), Some("post_story"));
        match response.data {
            Some(ResponseData::Story(story)) => {
                assert!(story.posted);
                assert_eq!(story.text, "Going live now");
                assert!(story.id.starts_with("story_"));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_real_latest_video_skips_images() {
        let mut server = Server::new_async().await;
        let listing = server
            .mock("GET", "/me/media")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("fields".into(), MEDIA_FIELDS.into()),
                Matcher::UrlEncoded("limit".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":[
                    {"id":"1","media_type":"IMAGE","permalink":"https://instagram.com/p/img"},
                    {"id":"2","media_type":"VIDEO","media_url":"https://cdn/v.mp4",
                     "permalink":"https://instagram.com/reel/2","timestamp":"2026-10-01T10:00:00+0000"}
                ]}"#,
            )
            .create_async()
            .await;

        let response = agent(real_instagram(&server.url(), false)).get_latest_item().await;
        listing.assert_async().await;

        let media = response.media_data().unwrap();
        assert_eq!(media.id, "2");
        assert_eq!(media.permalink, "https://instagram.com/reel/2");
        assert_eq!(media.caption, "No caption");
    }

    #[tokio::test]
    async fn test_no_video_without_fallback_is_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/me/media")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":[{"id":"1","media_type":"IMAGE"}]}"#)
            .create_async()
            .await;

        let response = agent(real_instagram(&server.url(), false)).get_latest_item().await;
        assert_eq!(response.status, ResponseStatus::Error);
        assert_eq!(response.message, "Failed to get latest reel: No video content found");
    }

    #[tokio::test]
    async fn test_api_error_falls_back_to_mock() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/me/media")
            .match_query(Matcher::Any)
            .with_status(400)
            .create_async()
            .await;

        let response = agent(real_instagram(&server.url(), true)).get_latest_item().await;
        assert_eq!(response.status, ResponseStatus::Success);
        assert!(response.media_data().unwrap().id.starts_with("demo_reel_"));
    }

    #[tokio::test]
    async fn test_check_new_content_nothing_found() {
        let store = Arc::new(MemoryStore::new());
        let response = agent_with_store(config(0.0, 0.0), store.clone())
            .check_for_new_content()
            .await;

        assert_eq!(response.message, "No new content since last check");
        assert_eq!(response.action.as_deref(), Some("check_new_content"));
        assert!(store.get(LAST_CHECK_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_check_new_content_found_records_time() {
        let store = Arc::new(MemoryStore::new());
        let response = agent_with_store(config(0.0, 1.0), store.clone())
            .check_for_new_content()
            .await;

        assert_eq!(response.action.as_deref(), Some("get_latest_reel"));
        assert!(response.media_data().is_some());
        assert!(store.get(LAST_CHECK_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_check_new_content_failed_fetch_keeps_marker() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/me/media")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let mut config = real_instagram(&server.url(), false);
        config.simulation.new_content_probability = 1.0;
        let store = Arc::new(MemoryStore::new());
        let response = agent_with_store(config, store.clone())
            .check_for_new_content()
            .await;

        assert_eq!(response.status, ResponseStatus::Error);
        assert!(response.message.starts_with("Failed to get latest reel"));
        assert!(store.get(LAST_CHECK_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_check_new_content_store_failure() {
        let response = agent_with_store(config(0.0, 1.0), Arc::new(BrokenStore))
            .check_for_new_content()
            .await;

        assert_eq!(response.status, ResponseStatus::Error);
        assert!(response.message.starts_with("Failed to check for new content"));
        assert!(response.message.contains("disk on fire"));
    }
}
