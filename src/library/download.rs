//! Save a track's audio next to the user, named after its title.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::http::{MAX_AUDIO_BYTES, agent, copy_response_to_writer};
use super::model::TrackRecord;
use super::source::Locator;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        source: Box<ureq::Error>,
    },
    #[error("failed to create {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("no free file name near {path}")]
    NameTaken { path: PathBuf },
}

const MAX_NAME_ATTEMPTS: usize = 1000;

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    cleaned.trim().trim_matches('.').trim().to_string()
}

/// File name for a downloaded track: the title plus the audio's extension.
///
/// Falls back to the referenced file's own name when the title is empty.
pub fn file_name_hint(record: &TrackRecord) -> String {
    let referenced = Path::new(&record.file_ref);
    let ext = referenced.extension().and_then(|e| e.to_str());

    let stem = sanitize(&record.title);
    if stem.is_empty() {
        let fallback = referenced
            .file_name()
            .and_then(|n| n.to_str())
            .map(sanitize)
            .unwrap_or_default();
        return if fallback.is_empty() {
            "track".to_string()
        } else {
            fallback
        };
    }

    match ext {
        Some(ext) if !ext.is_empty() => format!("{stem}.{ext}"),
        _ => stem,
    }
}

/// Copy the audio at `locator` into `dest_dir`, returning the written path.
///
/// The bytes are staged in a temporary file in `dest_dir` and only moved into
/// place once complete. Existing files are never replaced: if `file_name` is
/// taken, `name (1).ext`, `name (2).ext` and so on are tried.
pub fn download(locator: &Locator, dest_dir: &Path, file_name: &str) -> Result<PathBuf, DownloadError> {
    fs::create_dir_all(dest_dir).map_err(|source| DownloadError::CreateDir {
        path: dest_dir.to_path_buf(),
        source,
    })?;
    let write_err = |source| DownloadError::Write {
        path: dest_dir.to_path_buf(),
        source,
    };

    // Dropping `staged` on any error path removes the partial file.
    let mut staged = NamedTempFile::new_in(dest_dir).map_err(write_err)?;
    match locator {
        Locator::Path(path) => {
            let mut source = File::open(path).map_err(|source| DownloadError::Read {
                path: path.clone(),
                source,
            })?;
            io::copy(&mut source, &mut staged).map_err(write_err)?;
        }
        Locator::Url(url) => {
            let response = agent()
                .get(url.as_str())
                .call()
                .map_err(|source| DownloadError::Http {
                    url: url.to_string(),
                    source: Box::new(source),
                })?;
            let mut writer = BufWriter::new(&mut staged);
            copy_response_to_writer(response, &mut writer, MAX_AUDIO_BYTES).map_err(write_err)?;
            writer.flush().map_err(write_err)?;
        }
    }

    let target = persist_unique(staged, dest_dir, file_name)?;
    tracing::info!("Downloaded {locator} to {}", target.display());
    Ok(target)
}

fn persist_unique(mut staged: NamedTempFile, dest_dir: &Path, file_name: &str) -> Result<PathBuf, DownloadError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let target = dest_dir.join(numbered_name(file_name, attempt));
        match staged.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => staged = err.file,
            Err(err) => {
                return Err(DownloadError::Write {
                    path: target,
                    source: err.error,
                });
            }
        }
    }
    Err(DownloadError::NameTaken {
        path: dest_dir.join(file_name),
    })
}

/// `Intro.mp3` with `n = 2` becomes `Intro (2).mp3`; `n = 0` keeps the name.
fn numbered_name(file_name: &str, n: usize) -> String {
    if n == 0 {
        return file_name.to_string();
    }
    let path = Path::new(file_name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem} ({n}).{ext}"),
        None => format!("{stem} ({n})"),
    }
}
