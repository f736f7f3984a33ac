//! Playback handles: the per-track capability for loading, playing and
//! drawing audio.
//!
//! The catalogue only sees the `PlaybackHandle` trait. `RodioHandle` is the
//! real implementation; it loads and decodes on a worker thread and plays
//! through a shared `rodio` mixer.

mod handle;
mod rodio_handle;
mod waveform;

pub use handle::{HandleFactory, LoadStatus, PlaybackHandle};
pub use rodio_handle::{RodioFactory, open_output};
pub use waveform::{WaveformStyle, bar_levels, parse_hex_color};

#[cfg(test)]
pub(crate) mod fake;
