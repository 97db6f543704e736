//! Playback engine configuration.

use serde::{Deserialize, Serialize};

use crate::video_source::VideoDuration;

/// Configuration for the playback continuation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// How many results to request per fetch before picking one at random.
    #[serde(default = "default_fan_out")]
    pub fan_out: u32,

    /// Consecutive player errors tolerated before the engine stops
    /// auto-advancing and waits for a new mood selection.
    #[serde(default = "default_max_player_errors")]
    pub max_consecutive_player_errors: u32,

    /// Attempts per fetch when the failure is transient (no results,
    /// network, server errors).
    #[serde(default = "default_max_fetch_attempts")]
    pub max_fetch_attempts: u32,

    /// Duration filter applied to every search.
    #[serde(default)]
    pub video_duration: VideoDuration,
}

fn default_fan_out() -> u32 {
    15
}

fn default_max_player_errors() -> u32 {
    3
}

fn default_max_fetch_attempts() -> u32 {
    3
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fan_out: default_fan_out(),
            max_consecutive_player_errors: default_max_player_errors(),
            max_fetch_attempts: default_max_fetch_attempts(),
            video_duration: VideoDuration::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.fan_out, 15);
        assert_eq!(config.max_consecutive_player_errors, 3);
        assert_eq!(config.max_fetch_attempts, 3);
        assert_eq!(config.video_duration, VideoDuration::Medium);
    }

    #[test]
    fn test_deserialize_partial() {
        let toml = r#"
            fan_out = 25
            video_duration = "long"
        "#;
        let config: PlaybackConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.fan_out, 25);
        assert_eq!(config.video_duration, VideoDuration::Long);
        assert_eq!(config.max_consecutive_player_errors, 3);
    }
}
