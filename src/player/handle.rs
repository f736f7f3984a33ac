use std::time::Duration;

use crate::library::Locator;

use super::waveform::WaveformStyle;

/// Why a track's audio could not be made playable.
#[derive(Debug, thiserror::Error)]
pub enum ResourceLoadFailed {
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        source: Box<ureq::Error>,
    },
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },
    #[error("failed to decode {location}: {source}")]
    Decode {
        location: String,
        source: rodio::decoder::DecoderError,
    },
    #[error("no audio output device")]
    NoOutput,
    #[error("loader for {0} exited without a result")]
    Interrupted(String),
}

/// Load progress of a handle's audio resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    /// Terminal. Play stays disabled for this handle.
    Failed(String),
}

impl LoadStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadStatus::Ready)
    }
}

/// Per-track playback capability, exclusively owned by one catalogue item.
pub trait PlaybackHandle {
    /// Start loading `locator` in the background. Returns immediately.
    fn load(&mut self, locator: &Locator);
    /// Absorb a finished background load, if any, and return the current status.
    fn poll_load(&mut self) -> &LoadStatus;
    fn status(&self) -> &LoadStatus;
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    /// Normalized waveform peaks (`0.0..=1.0`); empty until loaded.
    fn peaks(&self) -> &[f32];
    fn duration(&self) -> Option<Duration>;
    fn position(&self) -> Duration;
    fn style(&self) -> &WaveformStyle;
}

/// Creates independent handles, one per catalogue item.
pub trait HandleFactory {
    type Handle: PlaybackHandle;

    fn create(&self, style: &WaveformStyle) -> Self::Handle;
}
