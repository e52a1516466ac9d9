use std::sync::Arc;

use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{chance, AgentError, AgentResponse, Platform, ResponseData, StreamData};
use crate::config::{AppConfig, TWITCH_USERNAME_PLACEHOLDER};

const ACTION_CHECK_STREAM: &str = "check_stream";

const MOCK_TITLE: &str = "Building Multi-Agent Bot System | Live Coding Session";
const MOCK_GAME: &str = "Software and Game Development";
const MOCK_THUMBNAIL: &str = "https://via.placeholder.com/320x180/9146ff/ffffff?text=DEMO+LIVE";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    #[serde(default)]
    data: Vec<HelixStream>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HelixStream {
    title: Option<String>,
    game_name: Option<String>,
    viewer_count: Option<u32>,
    thumbnail_url: Option<String>,
}

/// Stream status agent (Twitch Helix)
pub struct TwitchAgent {
    client: Client,
    config: Arc<AppConfig>,
}

impl TwitchAgent {
    pub fn new(client: Client, config: Arc<AppConfig>) -> Self {
        Self { client, config }
    }

    /// Check whether the channel is live
    pub async fn check_stream_status(&self) -> AgentResponse {
        if self.config.platforms.twitch.has_real_credentials() {
            match self.fetch_stream().await {
                Ok(stream) => return Self::status_response(stream),
                Err(e) if self.config.fallback_to_mock => {
                    warn!(error = %e, "Twitch API failed, using mock data");
                }
                Err(e) => {
                    return AgentResponse::error(
                        Platform::Twitch,
                        ACTION_CHECK_STREAM,
                        format!("Failed to check stream status: {}", e),
                    );
                }
            }
        }

        Self::status_response(self.mock_stream())
    }

    /// Current stream data, or `None` if the status check failed
    pub async fn get_stream_info(&self) -> Option<StreamData> {
        let response = self.check_stream_status().await;
        if !response.is_success() {
            debug!(message = %response.message, "No stream info available");
        }
        response.stream_data().cloned()
    }

    fn status_response(stream: StreamData) -> AgentResponse {
        let message = if stream.is_live {
            format!("Stream is LIVE: {}", stream.title)
        } else {
            "Stream is currently offline".to_string()
        };
        AgentResponse::success(Platform::Twitch, ACTION_CHECK_STREAM, message)
            .with_data(ResponseData::Stream(stream))
    }

    fn channel_url(&self) -> String {
        let username = &self.config.platforms.twitch.username;
        if username.is_empty() || username == TWITCH_USERNAME_PLACEHOLDER {
            "https://twitch.tv/demo_channel".to_string()
        } else {
            format!("https://twitch.tv/{}", username)
        }
    }

    fn mock_stream(&self) -> StreamData {
        let mut rng = rand::thread_rng();
        StreamData {
            is_live: chance(self.config.simulation.live_probability),
            title: MOCK_TITLE.into(),
            game: MOCK_GAME.into(),
            viewer_count: rng.gen_range(5..155),
            url: self.channel_url(),
            thumbnail_url: MOCK_THUMBNAIL.into(),
        }
    }

    async fn access_token(&self) -> Result<String, AgentError> {
        let twitch = &self.config.platforms.twitch;
        let response = self
            .client
            .post(&self.config.endpoints.twitch_oauth)
            .form(&[
                ("client_id", twitch.client_id.as_str()),
                ("client_secret", twitch.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AgentError::Status {
                platform: Platform::Twitch,
                code: response.status().as_u16(),
            });
        }

        let token: TokenResponse = response.json().await?;
        token.access_token.ok_or(AgentError::MissingField("access_token"))
    }

    async fn fetch_stream(&self) -> Result<StreamData, AgentError> {
        let twitch = &self.config.platforms.twitch;
        let token = self.access_token().await?;

        let response = self
            .client
            .get(&self.config.endpoints.twitch_streams)
            .query(&[("user_login", twitch.username.as_str())])
            .header("Client-ID", &twitch.client_id)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AgentError::Status {
                platform: Platform::Twitch,
                code: response.status().as_u16(),
            });
        }

        let body: StreamsResponse = response.json().await?;
        // Helix only lists channels that are currently live
        let stream = body.data.into_iter().next();
        let is_live = stream.is_some();
        let stream = stream.unwrap_or_default();

        Ok(StreamData {
            is_live,
            title: non_empty(stream.title).unwrap_or_else(|| "Stream Offline".into()),
            game: non_empty(stream.game_name).unwrap_or_else(|| "No Category".into()),
            viewer_count: stream.viewer_count.unwrap_or(0),
            url: format!("https://twitch.tv/{}", twitch.username),
            thumbnail_url: stream
                .thumbnail_url
                .map(|t| t.replace("{width}", "320").replace("{height}", "180"))
                .unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
