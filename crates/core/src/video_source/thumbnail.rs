//! Thumbnail selection policy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Resolution keys tried in order when picking a thumbnail.
pub const THUMBNAIL_PREFERENCE: [&str; 3] = ["high", "medium", "default"];

/// One thumbnail resolution as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Thumbnail set keyed by resolution name.
pub type Thumbnails = HashMap<String, Thumbnail>;

/// Pick the best thumbnail URL: "high", then "medium", then "default".
///
/// Returns `None` when none of them is present or all URLs are empty.
pub fn select_thumbnail(thumbnails: &Thumbnails) -> Option<String> {
    THUMBNAIL_PREFERENCE
        .iter()
        .filter_map(|key| thumbnails.get(*key))
        .find(|t| !t.url.is_empty())
        .map(|t| t.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumbnails(keys: &[&str]) -> Thumbnails {
        keys.iter()
            .map(|k| {
                (
                    k.to_string(),
                    Thumbnail {
                        url: format!("https://i.ytimg.com/{}.jpg", k),
                        width: None,
                        height: None,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_prefers_high() {
        let set = thumbnails(&["default", "medium", "high", "maxres"]);
        assert_eq!(
            select_thumbnail(&set).as_deref(),
            Some("https://i.ytimg.com/high.jpg")
        );
    }

    #[test]
    fn test_falls_back_to_medium_then_default() {
        let set = thumbnails(&["default", "medium"]);
        assert_eq!(
            select_thumbnail(&set).as_deref(),
            Some("https://i.ytimg.com/medium.jpg")
        );

        let set = thumbnails(&["default"]);
        assert_eq!(
            select_thumbnail(&set).as_deref(),
            Some("https://i.ytimg.com/default.jpg")
        );
    }

    #[test]
    fn test_no_known_resolution() {
        assert_eq!(select_thumbnail(&thumbnails(&["maxres"])), None);
        assert_eq!(select_thumbnail(&Thumbnails::new()), None);
    }

    #[test]
    fn test_skips_empty_urls() {
        let mut set = thumbnails(&["medium"]);
        set.insert(
            "high".to_string(),
            Thumbnail {
                url: String::new(),
                width: None,
                height: None,
            },
        );
        assert_eq!(
            select_thumbnail(&set).as_deref(),
            Some("https://i.ytimg.com/medium.jpg")
        );
    }
}
