//! Track records and the sources that produce them.
//!
//! A catalogue is an ordered list of `TrackRecord`s. It comes from an HTTP
//! endpoint, a local JSON file, or an in-process scan of a music directory
//! that pairs every audio file with a same-named JSON descriptor.

mod discover;
mod download;
mod http;
mod model;
mod options;
mod source;

pub use discover::discover;
pub use download::{download, file_name_hint};
pub use model::TrackRecord;
pub use options::{derive_category_options, derive_mood_options};
pub use source::{CatalogueSource, Locator, SourceBase, SourceUnavailable, open_source};

#[cfg(test)]
pub(crate) use source::FileSource;

pub(crate) use http::{MAX_AUDIO_BYTES, agent, read_response_bytes};
