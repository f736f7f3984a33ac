//! Catalogue sources: where the ordered list of track records comes from.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::config::{DiscoverySettings, Settings};

use super::discover::discover;
use super::http::{agent, read_response_bytes};
use super::model::TrackRecord;

/// The catalogue could not be obtained. The session continues with an empty list.
#[derive(Debug, thiserror::Error)]
pub enum SourceUnavailable {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        source: Box<ureq::Error>,
    },
    #[error("failed to read catalogue {location}: {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },
    #[error("invalid catalogue JSON from {location}: {source}")]
    Parse {
        location: String,
        source: serde_json::Error,
    },
    #[error("catalogue fetch ended without a result")]
    Interrupted,
}

/// Where an audio resource lives once its `file_ref` has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Url(Url),
    Path(PathBuf),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Url(url) => write!(f, "{url}"),
            Locator::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Base against which relative `file_ref`s are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceBase {
    Url(Url),
    Dir(PathBuf),
}

impl SourceBase {
    /// Resolve a record's `file_ref` into a locator.
    ///
    /// Absolute `http(s)://` and `file://` references win over the base.
    pub fn resolve(&self, file_ref: &str) -> Locator {
        if let Ok(url) = Url::parse(file_ref) {
            match url.scheme() {
                "http" | "https" => return Locator::Url(url),
                "file" => {
                    if let Ok(path) = url.to_file_path() {
                        return Locator::Path(path);
                    }
                }
                _ => {}
            }
        }

        match self {
            SourceBase::Url(base) => match base.join(file_ref) {
                Ok(url) => Locator::Url(url),
                Err(_) => Locator::Path(PathBuf::from(file_ref)),
            },
            SourceBase::Dir(dir) => {
                let path = Path::new(file_ref);
                if path.is_absolute() {
                    Locator::Path(path.to_path_buf())
                } else {
                    Locator::Path(dir.join(path))
                }
            }
        }
    }
}

/// Something that can produce the catalogue's track records.
pub trait CatalogueSource: Send {
    /// Human-readable location, used in the status line and logs.
    fn describe(&self) -> String;
    /// Base for resolving relative audio references.
    fn base(&self) -> SourceBase;
    /// Fetch the records in document order.
    fn fetch_tracks(&self) -> Result<Vec<TrackRecord>, SourceUnavailable>;
}

/// Parse the catalogue wire format: a JSON array of track objects.
pub fn parse_catalogue(bytes: &[u8], location: &str) -> Result<Vec<TrackRecord>, SourceUnavailable> {
    serde_json::from_slice(bytes).map_err(|source| SourceUnavailable::Parse {
        location: location.to_string(),
        source,
    })
}

/// Catalogue served over HTTP.
pub struct HttpSource {
    url: Url,
    max_bytes: usize,
}

impl HttpSource {
    pub fn new(url: Url, max_bytes: usize) -> Self {
        Self { url, max_bytes }
    }
}

impl CatalogueSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    fn base(&self) -> SourceBase {
        SourceBase::Url(self.url.clone())
    }

    fn fetch_tracks(&self) -> Result<Vec<TrackRecord>, SourceUnavailable> {
        let location = self.url.to_string();
        tracing::debug!("Fetching catalogue from {location}");
        let response = agent()
            .get(self.url.as_str())
            .call()
            .map_err(|source| SourceUnavailable::Http {
                url: location.clone(),
                source: Box::new(source),
            })?;
        let bytes = read_response_bytes(response, self.max_bytes).map_err(|source| {
            SourceUnavailable::Io {
                location: location.clone(),
                source,
            }
        })?;
        parse_catalogue(&bytes, &location)
    }
}

/// Catalogue stored in a local JSON file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CatalogueSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn base(&self) -> SourceBase {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        SourceBase::Dir(dir)
    }

    fn fetch_tracks(&self) -> Result<Vec<TrackRecord>, SourceUnavailable> {
        let location = self.describe();
        let bytes = fs::read(&self.path).map_err(|source| SourceUnavailable::Io {
            location: location.clone(),
            source,
        })?;
        parse_catalogue(&bytes, &location)
    }
}

/// Catalogue discovered by scanning a music directory for descriptor pairs.
pub struct DirectorySource {
    dir: PathBuf,
    settings: DiscoverySettings,
}

impl DirectorySource {
    pub fn new(dir: PathBuf, settings: DiscoverySettings) -> Self {
        Self { dir, settings }
    }
}

impl CatalogueSource for DirectorySource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn base(&self) -> SourceBase {
        SourceBase::Dir(self.dir.clone())
    }

    fn fetch_tracks(&self) -> Result<Vec<TrackRecord>, SourceUnavailable> {
        discover(&self.dir, &self.settings)
    }
}

/// Pick a source for `location`: URLs go over HTTP, directories are scanned,
/// anything else is read as a JSON file.
pub fn open_source(location: &str, settings: &Settings) -> Box<dyn CatalogueSource> {
    if let Ok(url) = Url::parse(location) {
        if matches!(url.scheme(), "http" | "https") {
            return Box::new(HttpSource::new(url, settings.source.max_catalogue_bytes));
        }
    }

    let path = PathBuf::from(location);
    if path.is_dir() {
        Box::new(DirectorySource::new(path, settings.discovery.clone()))
    } else {
        Box::new(FileSource::new(path))
    }
}
