//! Filter choices derived from the loaded catalogue.

use std::collections::HashSet;

use super::model::TrackRecord;

/// Distinct moods in first-seen order. An empty mood is a value of its own.
pub fn derive_mood_options(records: &[TrackRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    records
        .iter()
        .map(|r| r.mood.as_str())
        .filter(|mood| seen.insert(*mood))
        .map(str::to_string)
        .collect()
}

/// Distinct non-empty categories, lowercased, in first-seen order.
pub fn derive_category_options(records: &[TrackRecord]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .iter()
        .map(|r| r.category.trim().to_lowercase())
        .filter(|category| !category.is_empty() && seen.insert(category.clone()))
        .collect()
}
