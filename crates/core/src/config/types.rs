use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;
use crate::engine::PlaybackConfig;
use crate::streaming::StreamingConfig;
use crate::video_source::YouTubeConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub streaming: Option<StreamingConfig>,
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub youtube: SanitizedYouTubeConfig,
    pub cache: CacheConfig,
    pub playback: PlaybackConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<SanitizedStreamingConfig>,
}

/// Sanitized YouTube config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedYouTubeConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    /// False when the key is a known sample value.
    pub api_key_usable: bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStreamingConfig {
    pub api_url: String,
    pub auth_url: String,
    pub client_id_configured: bool,
    pub redirect_uri: String,
    pub market: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            youtube: SanitizedYouTubeConfig {
                base_url: config.youtube.base_url.clone(),
                api_key_configured: !config.youtube.api_key.trim().is_empty(),
                api_key_usable: config.youtube.has_usable_key(),
                timeout_secs: config.youtube.timeout_secs,
            },
            cache: config.cache.clone(),
            playback: config.playback.clone(),
            streaming: config.streaming.as_ref().map(|s| SanitizedStreamingConfig {
                api_url: s.api_url.clone(),
                auth_url: s.auth_url.clone(),
                client_id_configured: !s.client_id.trim().is_empty(),
                redirect_uri: s.redirect_uri.clone(),
                market: s.market.clone(),
            }),
        }
    }
}
