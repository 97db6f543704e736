use tracing::debug;

use super::{MoodDefinition, MoodError};
use crate::random::RandomSource;

/// The moods shipped with the application, in display order.
pub fn builtin_moods() -> Vec<MoodDefinition> {
    vec![
        MoodDefinition::new(
            "happy",
            "Happy",
            "😊",
            "Upbeat and positive vibes",
            &["happy music", "upbeat songs", "feel good music", "positive vibes"],
            "#FFD700",
        ),
        MoodDefinition::new(
            "sad",
            "Sad",
            "😢",
            "Melancholic and emotional",
            &["sad songs", "emotional music", "melancholy tunes", "heartbreak songs"],
            "#4682B4",
        ),
        MoodDefinition::new(
            "energetic",
            "Energetic",
            "⚡",
            "High energy and motivation",
            &["workout music", "energetic songs", "motivational music", "pump up songs"],
            "#FF4500",
        ),
        MoodDefinition::new(
            "calm",
            "Calm",
            "😌",
            "Relaxing and peaceful",
            &["calming music", "peaceful songs", "relaxing tunes", "meditation music"],
            "#7FB3D5",
        ),
        MoodDefinition::new(
            "focused",
            "Focused",
            "🧠",
            "Concentration and productivity",
            &["study music", "focus music", "concentration music", "productivity songs"],
            "#3498DB",
        ),
        MoodDefinition::new(
            "romantic",
            "Romantic",
            "❤️",
            "Love and affection",
            &["love songs", "romantic music", "love ballads", "romantic playlist"],
            "#E74C3C",
        ),
    ]
}

/// Immutable lookup table of mood definitions.
#[derive(Debug, Clone)]
pub struct MoodCatalog {
    moods: Vec<MoodDefinition>,
}

impl Default for MoodCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MoodCatalog {
    /// Catalog with the built-in moods.
    pub fn builtin() -> Self {
        Self {
            moods: builtin_moods(),
        }
    }

    /// Build a catalog from custom definitions.
    ///
    /// Rejects duplicate identifiers and definitions without keywords.
    pub fn from_definitions(moods: Vec<MoodDefinition>) -> Result<Self, MoodError> {
        for (i, mood) in moods.iter().enumerate() {
            if mood.id.is_empty() {
                return Err(MoodError::InvalidDefinition {
                    id: mood.id.clone(),
                    reason: "identifier is empty".to_string(),
                });
            }
            if mood.keywords.is_empty() {
                return Err(MoodError::InvalidDefinition {
                    id: mood.id.clone(),
                    reason: "keyword set is empty".to_string(),
                });
            }
            if moods[..i].iter().any(|m| m.id == mood.id) {
                return Err(MoodError::InvalidDefinition {
                    id: mood.id.clone(),
                    reason: "duplicate identifier".to_string(),
                });
            }
        }
        Ok(Self { moods })
    }

    /// Look up a mood by identifier.
    pub fn lookup(&self, mood_id: &str) -> Result<&MoodDefinition, MoodError> {
        self.moods
            .iter()
            .find(|m| m.id == mood_id)
            .ok_or_else(|| MoodError::NotFound(mood_id.to_string()))
    }

    /// Whether a mood with this identifier exists.
    pub fn contains(&self, mood_id: &str) -> bool {
        self.lookup(mood_id).is_ok()
    }

    /// All moods in display order.
    pub fn moods(&self) -> &[MoodDefinition] {
        &self.moods
    }

    /// Pick one of the mood's keywords uniformly at random.
    ///
    /// Returns an empty string for an unknown mood.
    pub fn random_keyword(&self, mood_id: &str, random: &dyn RandomSource) -> String {
        match self.lookup(mood_id) {
            Ok(mood) if !mood.keywords.is_empty() => {
                let keyword = mood.keywords[random.pick(mood.keywords.len())].clone();
                debug!(mood = mood_id, keyword = %keyword, "Picked mood keyword");
                keyword
            }
            _ => String::new(),
        }
    }
}
