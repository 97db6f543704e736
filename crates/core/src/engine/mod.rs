//! Playback continuation engine.
//!
//! Keeps a mood-driven session moving: selecting a mood fetches a random
//! matching video, and every finished or failed video triggers the next
//! fetch. Responses that arrive after the session moved on are dropped.

mod config;
mod runner;
mod types;

pub use config::PlaybackConfig;
pub use runner::{PlaybackEngine, SessionUpdateCallback, PLAYBACK_FAILED, PLAYER_ERROR};
pub use types::{EngineError, FetchOutcome, PlaybackState, SessionSnapshot};
