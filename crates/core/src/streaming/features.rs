//! Target audio features per mood for recommendation queries.

/// One recommendation tuning parameter, e.g. `("min_valence", 0.7)`.
pub type AudioFeature = (&'static str, f64);

/// Moods the recommendation endpoint knows how to tune for.
pub const STREAMING_MOODS: [&str; 6] = ["happy", "sad", "energetic", "relaxed", "focused", "angry"];

const HAPPY: &[AudioFeature] = &[("min_valence", 0.7), ("min_energy", 0.6), ("target_mode", 1.0)];
const SAD: &[AudioFeature] = &[("max_valence", 0.4), ("max_energy", 0.4), ("target_mode", 0.0)];
const ENERGETIC: &[AudioFeature] = &[("min_energy", 0.8), ("min_tempo", 120.0), ("target_mode", 1.0)];
const RELAXED: &[AudioFeature] = &[("max_energy", 0.4), ("max_tempo", 100.0), ("target_mode", 1.0)];
const FOCUSED: &[AudioFeature] = &[
    ("target_energy", 0.5),
    ("max_speechiness", 0.1),
    ("target_instrumentalness", 0.5),
];
const ANGRY: &[AudioFeature] = &[("min_energy", 0.7), ("max_valence", 0.4), ("target_mode", 0.0)];

/// Feature targets for a mood, matched case-insensitively.
pub fn mood_features(mood: &str) -> Option<&'static [AudioFeature]> {
    match mood.to_ascii_lowercase().as_str() {
        "happy" => Some(HAPPY),
        "sad" => Some(SAD),
        "energetic" => Some(ENERGETIC),
        "relaxed" => Some(RELAXED),
        "focused" => Some(FOCUSED),
        "angry" => Some(ANGRY),
        _ => None,
    }
}
