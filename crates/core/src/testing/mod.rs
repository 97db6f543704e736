//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external seams
//! (video API, clock, random source) so the engine can be exercised
//! without network access or timing dependencies.
//!
//! # Example
//!
//! ```rust,ignore
//! use moodmix_core::testing::{fixtures, ManualClock, MockVideoApi, SequenceRandom};
//!
//! let api = MockVideoApi::new();
//! api.set_results(fixtures::video_records(&["a", "b"])).await;
//!
//! let clock = ManualClock::new();
//! clock.advance(chrono::TimeDelta::minutes(31));
//! ```

mod manual_clock;
mod mock_video_api;
mod sequence_random;

pub use manual_clock::ManualClock;
pub use mock_video_api::{MockVideoApi, RecordedVideoCall};
pub use sequence_random::SequenceRandom;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::video_source::{VideoDetails, VideoRecord};

    /// Create a video record with reasonable defaults.
    pub fn video_record(id: &str) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: format!("Video {}", id),
            description: format!("Description of {}", id),
            thumbnail: Some(format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id)),
            channel_title: "Mock Channel".to_string(),
            published_at: Utc.with_ymd_and_hms(2023, 6, 15, 12, 0, 0).single(),
        }
    }

    /// Create one record per id.
    pub fn video_records(ids: &[&str]) -> Vec<VideoRecord> {
        ids.iter().map(|id| video_record(id)).collect()
    }

    /// Create video details for an id.
    pub fn video_details(id: &str) -> VideoDetails {
        VideoDetails {
            video: video_record(id),
            duration: Some("PT3M30S".to_string()),
            view_count: Some(1_000),
            like_count: Some(100),
        }
    }
}
