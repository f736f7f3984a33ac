//! Sort and filter over the full item set.

use serde::{Deserialize, Serialize};

use crate::config::ViewSettings;
use crate::library::TrackRecord;

use super::coordinator::ItemId;
use super::item::RenderedItem;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Title,
    Category,
    Fit,
    Mood,
    Tempo,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Title,
        SortKey::Category,
        SortKey::Fit,
        SortKey::Mood,
        SortKey::Tempo,
    ];

    /// The record field this key sorts by.
    pub fn value(self, record: &TrackRecord) -> &str {
        match self {
            SortKey::Title => &record.title,
            SortKey::Category => &record.category,
            SortKey::Fit => &record.fit,
            SortKey::Mood => &record.mood,
            SortKey::Tempo => &record.tempo,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Category => "category",
            SortKey::Fit => "fit",
            SortKey::Mood => "mood",
            SortKey::Tempo => "tempo",
        }
    }

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let pos = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(pos + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

/// Which items are visible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterPredicate {
    #[default]
    All,
    /// Lowercased category; compared against the item's lowercased category.
    ByCategory(String),
    /// Exact mood, as enumerated from the dataset.
    ByMood(String),
}

impl FilterPredicate {
    pub fn by_category(value: &str) -> Self {
        FilterPredicate::ByCategory(value.trim().to_lowercase())
    }

    pub fn by_mood(value: &str) -> Self {
        FilterPredicate::ByMood(value.to_string())
    }

    pub fn matches(&self, record: &TrackRecord) -> bool {
        match self {
            FilterPredicate::All => true,
            FilterPredicate::ByCategory(value) => record.category.trim().to_lowercase() == *value,
            FilterPredicate::ByMood(value) => record.mood == *value,
        }
    }

    pub fn label(&self) -> String {
        match self {
            FilterPredicate::All => "all".to_string(),
            FilterPredicate::ByCategory(value) => value.clone(),
            FilterPredicate::ByMood(value) if value.is_empty() => "mood: (none)".to_string(),
            FilterPredicate::ByMood(value) => format!("mood: {value}"),
        }
    }
}

/// The user's current sort and filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub filter: FilterPredicate,
}

impl ViewState {
    pub fn from_settings(settings: &ViewSettings) -> Self {
        Self {
            sort_key: settings.sort_key,
            sort_order: settings.sort_order,
            filter: FilterPredicate::All,
        }
    }
}

/// Locale-style sort key: accents and case only break ties, lowercase first.
///
/// Primary, case and raw weights are compared in that order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CollationKey {
    primary: String,
    upper: Vec<bool>,
    raw: String,
}

fn base_letter(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' | 'ś' => 's',
        'ž' | 'ź' | 'ż' => 'z',
        'ř' => 'r',
        'ł' => 'l',
        c => c,
    }
}

impl CollationKey {
    fn new(value: &str) -> Self {
        let mut primary = String::with_capacity(value.len());
        for c in value.chars().flat_map(char::to_lowercase) {
            match c {
                'ß' => primary.push_str("ss"),
                'æ' => primary.push_str("ae"),
                'œ' => primary.push_str("oe"),
                c => primary.push(base_letter(c)),
            }
        }
        Self {
            primary,
            upper: value.chars().map(char::is_uppercase).collect(),
            raw: value.to_string(),
        }
    }
}

/// Recompute order and visibility from the full item set.
///
/// Returns every item id (hidden ones included) in display order. Sorting is
/// stable in both directions; ties keep source order. Visibility never
/// touches playback.
pub fn apply<H>(items: &mut [RenderedItem<H>], view: &ViewState) -> Vec<ItemId> {
    let keys: Vec<CollationKey> = items
        .iter()
        .map(|item| CollationKey::new(view.sort_key.value(item.record())))
        .collect();

    let mut order: Vec<ItemId> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let ord = keys[a].cmp(&keys[b]);
        match view.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    for item in items.iter_mut() {
        let visible = view.filter.matches(item.record());
        item.set_visible(visible);
    }

    order
}
