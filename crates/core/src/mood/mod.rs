//! Mood catalog: the fixed set of moods and the search keywords behind them.

mod catalog;

pub use catalog::{builtin_moods, MoodCatalog};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the mood catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoodError {
    /// No mood with this identifier exists.
    #[error("unknown mood: {0}")]
    NotFound(String),

    /// A definition was rejected while building a catalog.
    #[error("invalid mood definition '{id}': {reason}")]
    InvalidDefinition { id: String, reason: String },
}

/// Display metadata and search keywords for one mood.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoodDefinition {
    /// Unique key (e.g. "happy").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display glyph (an emoji).
    pub glyph: String,
    /// Short description.
    pub description: String,
    /// Search keywords. Never empty.
    pub keywords: Vec<String>,
    /// Theme color as a hex string.
    pub color: String,
}

impl MoodDefinition {
    pub fn new(
        id: &str,
        name: &str,
        glyph: &str,
        description: &str,
        keywords: &[&str],
        color: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            glyph: glyph.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            color: color.to_string(),
        }
    }
}
