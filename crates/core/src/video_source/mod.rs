//! Video source: search and detail lookups against a video search API.
//!
//! [`VideoApi`] is the transport seam (implemented over HTTP by
//! [`YouTubeApi`]); [`VideoSourceClient`] layers mood-based query
//! composition and the [`ResultCache`](crate::cache::ResultCache) on top.

mod client;
mod thumbnail;
mod types;
mod youtube;

pub use client::{VideoSourceClient, QUERY_SUFFIX};
pub use thumbnail::{select_thumbnail, Thumbnail, Thumbnails, THUMBNAIL_PREFERENCE};
pub use types::*;
pub use youtube::{YouTubeApi, YouTubeConfig, KNOWN_PLACEHOLDER_KEYS};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by the video source.
///
/// Every failure is returned as a value; none of them is fatal to the
/// process. [`VideoSourceError::code`] gives the stable wire code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VideoSourceError {
    /// API key missing or still set to a sample value.
    #[error("Please add a valid YouTube API key to the configuration")]
    InvalidApiKey,

    /// Detail lookup without a video id.
    #[error("Video ID is required")]
    MissingVideoId,

    /// HTTP 403 with a quota reason.
    #[error("YouTube API quota exceeded. Please try again tomorrow.")]
    QuotaExceeded,

    /// HTTP 400, or options rejected before sending.
    #[error("Invalid request parameters: {0}")]
    BadRequest(String),

    /// HTTP 401.
    #[error("Invalid API key")]
    Unauthorized,

    /// HTTP 404.
    #[error("The requested resource was not found")]
    NotFound,

    /// HTTP 5xx.
    #[error("YouTube server error ({status}). Please try again later.")]
    ServerError { status: u16 },

    /// No response was received (connection failure, timeout).
    #[error("Network error. Please check your internet connection. ({0})")]
    NetworkError(String),

    /// Anything else, including unparseable responses.
    #[error("An error occurred while fetching data from YouTube: {0}")]
    UnknownError(String),

    /// Detail lookup returned zero items.
    #[error("The requested video was not found: {0}")]
    VideoNotFound(String),

    /// Search succeeded with an empty result list.
    #[error("No videos found for mood '{mood}' (query '{query}')")]
    NoResults { mood: String, query: String },

    /// Mood identifier not present in the catalog.
    #[error("Unknown mood: {0}")]
    UnknownMood(String),
}

impl VideoSourceError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidApiKey => "INVALID_API_KEY",
            Self::MissingVideoId => "MISSING_VIDEO_ID",
            Self::QuotaExceeded => "QUOTA_EXCEEDED",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::ServerError { .. } => "SERVER_ERROR",
            Self::NetworkError(_) => "NETWORK_ERROR",
            Self::UnknownError(_) => "UNKNOWN_ERROR",
            Self::VideoNotFound(_) => "VIDEO_NOT_FOUND",
            Self::NoResults { .. } => "NO_RESULTS",
            Self::UnknownMood(_) => "UNKNOWN_MOOD",
        }
    }

    /// Whether issuing the same request again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NoResults { .. }
                | Self::NetworkError(_)
                | Self::ServerError { .. }
                | Self::UnknownError(_)
        )
    }

    /// Whether recovery needs operator action (a new key, quota reset,
    /// a valid mood). Automatic retries are suppressed for these.
    pub fn requires_intervention(&self) -> bool {
        matches!(
            self,
            Self::InvalidApiKey | Self::QuotaExceeded | Self::UnknownMood(_)
        )
    }

    /// Both "nothing matched" outcomes share this class.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::VideoNotFound(_) | Self::NoResults { .. }
        )
    }
}

/// Serializable error outcome handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
    /// False when the user cannot fix this by retrying or reselecting.
    pub recoverable: bool,
}

impl ErrorReport {
    pub fn new(code: &str, message: impl Into<String>, recoverable: bool) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            recoverable,
        }
    }
}

impl From<&VideoSourceError> for ErrorReport {
    fn from(err: &VideoSourceError) -> Self {
        Self::new(err.code(), err.to_string(), !err.requires_intervention())
    }
}

/// Transport used by [`VideoSourceClient`].
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Checked before every request, without touching the network.
    fn check_credentials(&self) -> Result<(), VideoSourceError> {
        Ok(())
    }

    /// Run a search and normalize the returned items.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<VideoRecord>, VideoSourceError>;

    /// Fetch one video. Zero matching items is `VideoNotFound`.
    async fn video(&self, video_id: &str) -> Result<VideoDetails, VideoSourceError>;
}
