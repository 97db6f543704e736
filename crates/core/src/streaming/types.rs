//! Streaming service data types.

use serde::{Deserialize, Serialize};

/// The authenticated user's profile (`GET /me`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A recommended track, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// First credited artist.
    pub artist: String,
    pub album: String,
    /// Formatted as `m:ss`.
    pub duration: String,
    pub image_url: Option<String>,
    pub uri: String,
}

/// A playlist created on the user's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

/// Format a millisecond duration as `m:ss`, rounding to the nearest second.
pub fn format_duration(ms: u64) -> String {
    let total_secs = (ms + 500) / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

// Wire types

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationsResponse {
    #[serde(default)]
    pub tracks: Vec<ApiTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ApiNamed>,
    pub album: ApiAlbum,
    pub duration_ms: u64,
    pub uri: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiNamed {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: String,
}

impl From<ApiTrack> for Track {
    fn from(track: ApiTrack) -> Self {
        // Albums list images largest first; the third is the small thumbnail.
        let image_url = track
            .album
            .images
            .get(2)
            .or(track.album.images.last())
            .map(|image| image.url.clone());

        Self {
            id: track.id,
            name: track.name,
            artist: track
                .artists
                .into_iter()
                .next()
                .map(|artist| artist.name)
                .unwrap_or_default(),
            album: track.album.name,
            duration: format_duration(track.duration_ms),
            image_url,
            uri: track.uri,
        }
    }
}
