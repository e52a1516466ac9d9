//! Config builders shared by the agent tests.

use crate::config::AppConfig;

/// Mock-only config with fixed simulation odds
pub fn config(live_probability: f64, new_content_probability: f64) -> AppConfig {
    let mut config = AppConfig::default();
    config.simulation.live_probability = live_probability;
    config.simulation.new_content_probability = new_content_probability;
    config
}

/// Twitch credentials pointing at a local mock server
pub fn real_twitch(base_url: &str, fallback_to_mock: bool) -> AppConfig {
    let mut config = config(0.0, 0.0);
    config.fallback_to_mock = fallback_to_mock;
    config.platforms.twitch.client_id = "cid".into();
    config.platforms.twitch.client_secret = "secret".into();
    config.platforms.twitch.username = "streamer".into();
    config.endpoints.twitch_oauth = format!("{}/oauth2/token", base_url);
    config.endpoints.twitch_streams = format!("{}/helix/streams", base_url);
    config
}

/// Instagram token pointing at a local mock server
pub fn real_instagram(base_url: &str, fallback_to_mock: bool) -> AppConfig {
    let mut config = config(0.0, 0.0);
    config.fallback_to_mock = fallback_to_mock;
    config.platforms.instagram.access_token = "IGQVJ-long-lived-test-token".into();
    config.platforms.instagram.user_id = "1784".into();
    config.endpoints.instagram_media = format!("{}/me/media", base_url);
    config
}

/// Discord webhook pointing at a local mock server
pub fn real_discord(base_url: &str, fallback_to_mock: bool) -> AppConfig {
    let mut config = config(0.0, 0.0);
    config.fallback_to_mock = fallback_to_mock;
    config.platforms.discord.webhook_url = format!("{}/api/webhooks/1/abc", base_url);
    config
}
