//! Types for video search and detail lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// YouTube category id for "Music".
pub const MUSIC_CATEGORY_ID: &str = "10";

/// Largest `maxResults` the search endpoint accepts.
pub const MAX_RESULTS_LIMIT: u32 = 50;

/// A normalized search or detail result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoRecord {
    /// Opaque video id from the API.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Best available thumbnail per the fallback policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Publisher display name.
    pub channel_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

/// A video record with the extra fields of a detail lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoDetails {
    #[serde(flatten)]
    pub video: VideoRecord,
    /// ISO-8601 duration as returned by the API (e.g. "PT4M13S").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
}

impl VideoDetails {
    /// Duration in seconds, parsed from the ISO-8601 value.
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration.as_deref().and_then(parse_iso8601_duration)
    }
}

/// Parse the subset of ISO-8601 durations the API emits (`P#DT#H#M#S`).
pub fn parse_iso8601_duration(value: &str) -> Option<u64> {
    let rest = value.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, t),
        None => (rest, ""),
    };

    let mut total = 0u64;
    let mut digits = String::new();
    for c in date_part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let n: u64 = digits.parse().ok()?;
        digits.clear();
        let unit: u64 = match c {
            'W' => 7 * 86_400,
            'D' => 86_400,
            _ => return None,
        };
        total = total.checked_add(n.checked_mul(unit)?)?;
    }
    if !digits.is_empty() {
        return None;
    }

    for c in time_part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let n: u64 = digits.parse().ok()?;
        digits.clear();
        let unit: u64 = match c {
            'H' => 3600,
            'M' => 60,
            'S' => 1,
            _ => return None,
        };
        total = total.checked_add(n.checked_mul(unit)?)?;
    }
    if !digits.is_empty() {
        return None;
    }

    Some(total)
}

/// Duration filter of the search endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoDuration {
    /// Under four minutes.
    Short,
    /// Four to twenty minutes.
    #[default]
    Medium,
    /// Over twenty minutes.
    Long,
}

impl VideoDuration {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoDuration::Short => "short",
            VideoDuration::Medium => "medium",
            VideoDuration::Long => "long",
        }
    }
}

impl std::str::FromStr for VideoDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(VideoDuration::Short),
            "medium" => Ok(VideoDuration::Medium),
            "long" => Ok(VideoDuration::Long),
            other => Err(format!("unknown video duration: {}", other)),
        }
    }
}

/// Options for a mood search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Number of results to request (1..=50, default 10).
    pub max_results: u32,
    pub duration: VideoDuration,
    /// Category filter (default: music).
    pub category_id: String,
    /// Serve from the cache when a valid entry exists.
    pub use_cache: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            duration: VideoDuration::default(),
            category_id: MUSIC_CATEGORY_ID.to_string(),
            use_cache: true,
        }
    }
}

impl SearchOptions {
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_duration(mut self, duration: VideoDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = category_id.into();
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }
}

/// A fully realized search request as sent to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub duration: VideoDuration,
    pub category_id: String,
}

/// Outcome of a successful mood search. `videos` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub mood: String,
    /// The composed query that was used.
    pub query: String,
    pub videos: Vec<VideoRecord>,
    /// Whether the videos came from the cache.
    pub from_cache: bool,
}
