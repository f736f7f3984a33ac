use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::DiscoverySettings;

use super::model::TrackRecord;
use super::source::SourceUnavailable;

/// A single audio file's descriptor could not be used; the track is skipped.
#[derive(Debug, thiserror::Error)]
pub enum RecordMalformed {
    #[error("descriptor {0} not found")]
    MissingDescriptor(PathBuf),
    #[error("failed to read descriptor {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse descriptor {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn is_audio_file(path: &Path, settings: &DiscoverySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// `file_ref` for an audio file: its path relative to `root`, `/`-separated.
fn relative_ref(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn describe(root: &Path, audio: &Path, settings: &DiscoverySettings) -> Result<TrackRecord, RecordMalformed> {
    let descriptor = audio.with_extension(settings.descriptor_extension.trim_start_matches('.'));
    if !descriptor.is_file() {
        return Err(RecordMalformed::MissingDescriptor(descriptor));
    }

    let bytes = fs::read(&descriptor).map_err(|source| RecordMalformed::Unreadable {
        path: descriptor.clone(),
        source,
    })?;
    let parsed: TrackRecord =
        serde_json::from_slice(&bytes).map_err(|source| RecordMalformed::Invalid {
            path: descriptor.clone(),
            source,
        })?;

    // The audio file's location always wins over whatever the descriptor says.
    Ok(TrackRecord {
        file_ref: relative_ref(root, audio),
        ..parsed
    })
}

/// Scan `dir` (non-recursively) for audio files that have a sidecar descriptor.
///
/// Files are visited in file-name order. Tracks whose descriptor is missing or
/// invalid are logged and omitted; only an unreadable `dir` fails the scan.
pub fn discover(dir: &Path, settings: &DiscoverySettings) -> Result<Vec<TrackRecord>, SourceUnavailable> {
    fs::read_dir(dir).map_err(|source| SourceUnavailable::Io {
        location: dir.display().to_string(),
        source,
    })?;

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut tracks = Vec::new();
    for entry in walker.into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_file()
            || (!settings.include_hidden && is_hidden(path))
            || !is_audio_file(path, settings)
        {
            continue;
        }

        match describe(dir, path, settings) {
            Ok(record) => tracks.push(record),
            Err(err) => tracing::warn!("Skipping {}: {err}", path.display()),
        }
    }

    tracing::info!("Discovered {} tracks in {}", tracks.len(), dir.display());
    Ok(tracks)
}
