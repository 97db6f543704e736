use super::{types::Config, ConfigError};
use crate::video_source::MAX_RESULTS_LIMIT;

/// Validate configuration
/// Currently validates:
/// - YouTube base URL is set and timeout is not 0
/// - Cache expiry is not 0
/// - Playback fan-out is within the API page limit, error bounds are not 0
/// - Streaming URLs are set when the section is present
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // YouTube validation
    if config.youtube.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "youtube.base_url cannot be empty".to_string(),
        ));
    }
    if config.youtube.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "youtube.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.cache.expiry_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.expiry_secs cannot be 0".to_string(),
        ));
    }

    // Playback validation
    let playback = &config.playback;
    if playback.fan_out == 0 || playback.fan_out > MAX_RESULTS_LIMIT {
        return Err(ConfigError::ValidationError(format!(
            "playback.fan_out must be between 1 and {}",
            MAX_RESULTS_LIMIT
        )));
    }
    if playback.max_consecutive_player_errors == 0 {
        return Err(ConfigError::ValidationError(
            "playback.max_consecutive_player_errors cannot be 0".to_string(),
        ));
    }
    if playback.max_fetch_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "playback.max_fetch_attempts cannot be 0".to_string(),
        ));
    }

    if let Some(streaming) = &config.streaming {
        if streaming.api_url.trim().is_empty() || streaming.auth_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "streaming.api_url and streaming.auth_url cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
