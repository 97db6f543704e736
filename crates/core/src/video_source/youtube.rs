//! YouTube Data API v3 client.
//!
//! Requires an API key. Requests without a usable key are refused locally
//! and never reach the network.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::thumbnail::{select_thumbnail, Thumbnails};
use super::types::{SearchRequest, VideoDetails, VideoRecord};
use super::{VideoApi, VideoSourceError};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Sample credentials that ship in example configuration files.
pub const KNOWN_PLACEHOLDER_KEYS: &[&str] = &[
    "343842674094-f7ap1nedfph7tbpo7olt7dol104lgst2.apps.googleusercontent.com",
    "YOUR_API_KEY",
    "your-youtube-api-key",
];

/// YouTube API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// API key (required, must not be a sample value).
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: https://www.googleapis.com/youtube/v3).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl YouTubeConfig {
    /// Whether the key is present and not a known sample value.
    pub fn has_usable_key(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && !KNOWN_PLACEHOLDER_KEYS.contains(&key)
    }
}

/// YouTube API client.
pub struct YouTubeApi {
    client: Client,
    base_url: String,
    config: YouTubeConfig,
}

impl YouTubeApi {
    /// Create a new client.
    ///
    /// An unusable key does not fail construction; every request reports
    /// `InvalidApiKey` instead.
    pub fn new(config: YouTubeConfig) -> Result<Self, VideoSourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VideoSourceError::UnknownError(e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        if !config.has_usable_key() {
            warn!("YouTube API key is missing or a sample value, requests will be refused");
        }

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, VideoSourceError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| VideoSourceError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VideoSourceError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            let err = classify_failure(status.as_u16(), &body);
            warn!(status = status.as_u16(), code = err.code(), "YouTube API error");
            return Err(err);
        }

        Ok(body)
    }
}

#[async_trait]
impl VideoApi for YouTubeApi {
    fn name(&self) -> &str {
        "youtube"
    }

    fn check_credentials(&self) -> Result<(), VideoSourceError> {
        if self.config.has_usable_key() {
            Ok(())
        } else {
            Err(VideoSourceError::InvalidApiKey)
        }
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<VideoRecord>, VideoSourceError> {
        self.check_credentials()?;

        let url = format!("{}/search", self.base_url);
        let max_results = request.max_results.to_string();

        debug!(
            query = %request.query,
            max_results = request.max_results,
            duration = request.duration.as_str(),
            "YouTube search"
        );

        let body = self
            .get(
                &url,
                &[
                    ("part", "snippet"),
                    ("q", request.query.as_str()),
                    ("type", "video"),
                    ("maxResults", max_results.as_str()),
                    ("videoCategoryId", request.category_id.as_str()),
                    ("videoDuration", request.duration.as_str()),
                ],
            )
            .await?;

        let response: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            VideoSourceError::UnknownError(format!("Failed to parse search response: {}", e))
        })?;

        let videos: Vec<VideoRecord> = response
            .items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet?;
                match item.id.video_id {
                    Some(id) if !id.is_empty() => Some(snippet.into_record(id)),
                    _ => {
                        debug!("Skipping search item without a video id");
                        None
                    }
                }
            })
            .collect();

        debug!(results = videos.len(), "YouTube search complete");
        Ok(videos)
    }

    async fn video(&self, video_id: &str) -> Result<VideoDetails, VideoSourceError> {
        self.check_credentials()?;
        if video_id.is_empty() {
            return Err(VideoSourceError::MissingVideoId);
        }

        let url = format!("{}/videos", self.base_url);

        debug!(video_id = video_id, "YouTube get video");

        let body = self
            .get(
                &url,
                &[("part", "snippet,contentDetails,statistics"), ("id", video_id)],
            )
            .await?;

        let response: VideosResponse = serde_json::from_str(&body).map_err(|e| {
            VideoSourceError::UnknownError(format!("Failed to parse video response: {}", e))
        })?;

        let item = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| VideoSourceError::VideoNotFound(video_id.to_string()))?;

        let snippet = item.snippet.unwrap_or_default();
        let statistics = item.statistics.unwrap_or_default();

        Ok(VideoDetails {
            video: snippet.into_record(item.id),
            duration: item.content_details.and_then(|c| c.duration),
            view_count: statistics.view_count.and_then(|v| v.parse().ok()),
            like_count: statistics.like_count.and_then(|v| v.parse().ok()),
        })
    }
}

/// Map a non-success HTTP status and its body to an error kind.
pub(crate) fn classify_failure(status: u16, body: &str) -> VideoSourceError {
    let envelope: Option<ErrorEnvelope> = serde_json::from_str(body).ok();
    let error = envelope.and_then(|e| e.error);
    let message = error
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| body.chars().take(200).collect());

    match status {
        403 => {
            let quota = error
                .as_ref()
                .map(|e| {
                    e.errors
                        .iter()
                        .any(|d| d.reason.as_deref() == Some("quotaExceeded"))
                })
                .unwrap_or(false);
            if quota {
                VideoSourceError::QuotaExceeded
            } else {
                VideoSourceError::UnknownError(format!("HTTP 403: {}", message))
            }
        }
        400 => VideoSourceError::BadRequest(message),
        401 => VideoSourceError::Unauthorized,
        404 => VideoSourceError::NotFound,
        s if s >= 500 => VideoSourceError::ServerError { status: s },
        s => VideoSourceError::UnknownError(format!("HTTP {}: {}", s, message)),
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    #[serde(default)]
    channel_title: String,
    published_at: Option<String>,
}

impl Snippet {
    fn into_record(self, id: String) -> VideoRecord {
        VideoRecord {
            id,
            thumbnail: select_thumbnail(&self.thumbnails),
            title: self.title,
            description: self.description,
            channel_title: self.channel_title,
            published_at: self
                .published_at
                .as_deref()
                .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
                .map(|d| d.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: Option<Snippet>,
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}
