//! Music streaming service integration.
//!
//! An optional collaborator: it can authorize a user through the implicit
//! grant flow and ask the service for mood-based track recommendations.
//! The playback engine never depends on it.

mod client;
mod config;
mod features;
mod token;
mod types;

pub use client::StreamingClient;
pub use config::{authorize_url, StreamingConfig, AUTH_SCOPES};
pub use features::{mood_features, AudioFeature, STREAMING_MOODS};
pub use token::{parse_redirect_fragment, MemoryTokenStore, TokenStore};
pub use types::{format_duration, Playlist, Track, UserProfile};

use thiserror::Error;

/// Errors from the streaming service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StreamingError {
    /// No access token is stored.
    #[error("not authenticated with the streaming service")]
    NotAuthenticated,

    /// The token was rejected (expired or revoked).
    #[error("streaming service rejected the access token")]
    Unauthorized,

    /// No audio feature profile exists for this mood.
    #[error("no recommendation profile for mood '{0}'")]
    UnsupportedMood(String),

    /// Required configuration is missing.
    #[error("invalid streaming configuration: {0}")]
    InvalidConfig(String),

    /// The service answered with an error status.
    #[error("streaming API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request could not be completed.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
