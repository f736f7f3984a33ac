use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalogue::{SortKey, SortOrder};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/zensync/config.toml` or `~/.config/zensync/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ZENSYNC__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub discovery: DiscoverySettings,
    pub view: ViewSettings,
    pub waveform: WaveformSettings,
    pub ui: UiSettings,
    pub downloads: DownloadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Catalogue location: an `http(s)://` URL, a JSON file, or a music directory.
    /// The first command-line argument overrides it.
    pub location: String,
    /// Largest catalogue body accepted over HTTP, in bytes.
    pub max_catalogue_bytes: usize,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            location: "music".to_string(),
            max_catalogue_bytes: 8 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Extension of the sidecar descriptor next to each audio file.
    pub descriptor_extension: String,
    /// Whether to include hidden files (dotfiles).
    pub include_hidden: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
            descriptor_extension: "json".to_string(),
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Initial sort field: title, category, fit, mood or tempo.
    pub sort_key: SortKey,
    /// Initial sort direction: asc or desc.
    pub sort_order: SortOrder,
    /// Category filter choices. Empty means "derive from the catalogue".
    pub category_filters: Vec<String>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            sort_key: SortKey::Title,
            sort_order: SortOrder::Asc,
            category_filters: vec!["instrumental".into(), "vocal".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WaveformSettings {
    /// Bar color above the split line (`#RRGGBB`).
    pub wave_top: String,
    /// Bar color below the split line.
    pub wave_bottom: String,
    /// Played-part color above the split line.
    pub progress_top: String,
    /// Played-part color below the split line.
    pub progress_bottom: String,
    /// Fraction of the height drawn in the top colors.
    pub split: f32,
    /// Terminal cells per bar.
    pub bar_width: u16,
    /// Rows of the waveform panel.
    pub height: u16,
    /// Peaks kept per track after decoding.
    pub resolution: usize,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            wave_top: "#EE772F".to_string(),
            wave_bottom: "#F6B094".to_string(),
            progress_top: "#656666".to_string(),
            progress_bottom: "#B1B1B1".to_string(),
            split: 0.7,
            bar_width: 2,
            height: 4,
            resolution: 512,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the list title shows how many tracks the filter hides.
    pub show_hidden_count: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ ZEN'SYNC music library ~ ".to_string(),
            show_hidden_count: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Where `d` saves the selected track.
    pub dir: PathBuf,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log directory. Defaults to `$XDG_STATE_HOME/zensync/logs` or `~/.local/state/zensync/logs`.
    pub dir: Option<PathBuf>,
    /// Number of per-launch log files to keep.
    pub max_files: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: None,
            max_files: 10,
        }
    }
}
