//! Types for the playback engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::video_source::{ErrorReport, VideoRecord};

/// Errors returned by the playback engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The operation is not allowed in the current state.
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: PlaybackState,
    },
}

/// Lifecycle state of a playback session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No mood selected yet.
    #[default]
    Idle,
    /// A fetch for the next video is in flight.
    Loading,
    /// A video is playing.
    Playing,
    /// The last fetch or playback failed; waiting for a new selection.
    Error,
}

impl PlaybackState {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Loading => "loading",
            PlaybackState::Playing => "playing",
            PlaybackState::Error => "error",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of the session, handed to observers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: PlaybackState,
    pub selected_mood: Option<String>,
    pub current: Option<VideoRecord>,
    /// Videos played earlier in this session, oldest first.
    pub history: Vec<VideoRecord>,
    pub last_error: Option<ErrorReport>,
    /// Raw code of the most recent player failure.
    pub last_player_error: Option<String>,
    pub consecutive_player_errors: u32,
    /// True while a fetch is in flight.
    pub loading: bool,
}

/// Result of a transition that fetches the next video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A new video was committed as current.
    Playing(VideoRecord),
    /// The engine moved to the error state.
    Failed(ErrorReport),
    /// The response arrived after the session moved on and was discarded.
    Stale,
}
