//! `rodio`-backed playback handles.
//!
//! Each handle fetches and decodes its audio on its own worker thread. The
//! decoded bytes are kept in memory so playback can restart without another
//! fetch; the waveform is reduced to normalized peaks during the same pass.

use std::fs;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::library::{Locator, MAX_AUDIO_BYTES, agent, read_response_bytes};

use super::handle::{HandleFactory, LoadStatus, PlaybackHandle, ResourceLoadFailed};
use super::waveform::{WaveformStyle, normalize, resample_peaks, summarize};

/// Open the default output device. `None` leaves every track unplayable.
pub fn open_output() -> Option<OutputStream> {
    match OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            // rodio logs to stderr when the stream is dropped, which garbles the TUI.
            stream.log_on_drop(false);
            Some(stream)
        }
        Err(err) => {
            tracing::error!("No audio output device: {err}");
            None
        }
    }
}

struct DecodedAudio {
    bytes: Arc<[u8]>,
    peaks: Vec<f32>,
    duration: Option<Duration>,
}

type LoadResult = Result<DecodedAudio, ResourceLoadFailed>;

fn fetch_bytes(locator: &Locator) -> Result<Vec<u8>, ResourceLoadFailed> {
    match locator {
        Locator::Path(path) => fs::read(path).map_err(|source| ResourceLoadFailed::Io {
            location: locator.to_string(),
            source,
        }),
        Locator::Url(url) => {
            let response =
                agent()
                    .get(url.as_str())
                    .call()
                    .map_err(|source| ResourceLoadFailed::Fetch {
                        url: url.to_string(),
                        source: Box::new(source),
                    })?;
            read_response_bytes(response, MAX_AUDIO_BYTES).map_err(|source| {
                ResourceLoadFailed::Io {
                    location: locator.to_string(),
                    source,
                }
            })
        }
    }
}

fn decode(bytes: Arc<[u8]>, resolution: usize, location: &str) -> LoadResult {
    let decoder =
        Decoder::new(Cursor::new(bytes.clone())).map_err(|source| ResourceLoadFailed::Decode {
            location: location.to_string(),
            source,
        })?;
    let channels = u16::from(decoder.channels());
    let sample_rate = u32::from(decoder.sample_rate());
    let declared = decoder.total_duration();

    let summary = summarize(decoder, channels);
    let duration = declared.or_else(|| {
        (sample_rate > 0).then(|| Duration::from_secs_f64(summary.frames as f64 / f64::from(sample_rate)))
    });

    let mut peaks = resample_peaks(&summary.coarse, resolution);
    normalize(&mut peaks);

    Ok(DecodedAudio {
        bytes,
        peaks,
        duration,
    })
}

fn load_blocking(locator: &Locator, resolution: usize) -> LoadResult {
    let bytes: Arc<[u8]> = fetch_bytes(locator)?.into();
    decode(bytes, resolution, &locator.to_string())
}

/// Creates `RodioHandle`s that all play through one mixer.
pub struct RodioFactory {
    mixer: Option<Mixer>,
    resolution: usize,
}

impl RodioFactory {
    pub fn new(mixer: Option<Mixer>, resolution: usize) -> Self {
        Self {
            mixer,
            resolution: resolution.max(1),
        }
    }
}

impl HandleFactory for RodioFactory {
    type Handle = RodioHandle;

    fn create(&self, style: &WaveformStyle) -> RodioHandle {
        RodioHandle {
            mixer: self.mixer.clone(),
            resolution: self.resolution,
            style: style.clone(),
            status: LoadStatus::Loading,
            location: String::new(),
            pending: None,
            audio: None,
            sink: None,
        }
    }
}

pub struct RodioHandle {
    mixer: Option<Mixer>,
    resolution: usize,
    style: WaveformStyle,
    status: LoadStatus,
    location: String,
    pending: Option<Receiver<LoadResult>>,
    audio: Option<DecodedAudio>,
    sink: Option<Sink>,
}

impl RodioHandle {
    fn fail(&mut self, err: ResourceLoadFailed) {
        tracing::warn!("Track unavailable: {err}");
        self.status = LoadStatus::Failed(err.to_string());
        self.pending = None;
        self.sink = None;
    }

    /// A fresh paused sink positioned at the start of the decoded audio.
    fn new_sink(&self) -> Result<Sink, ResourceLoadFailed> {
        let (Some(mixer), Some(audio)) = (self.mixer.as_ref(), self.audio.as_ref()) else {
            return Err(ResourceLoadFailed::NoOutput);
        };
        let source = Decoder::new(Cursor::new(audio.bytes.clone())).map_err(|source| {
            ResourceLoadFailed::Decode {
                location: self.location.clone(),
                source,
            }
        })?;
        let sink = Sink::connect_new(mixer);
        sink.append(source);
        sink.pause();
        Ok(sink)
    }
}

impl PlaybackHandle for RodioHandle {
    fn load(&mut self, locator: &Locator) {
        self.location = locator.to_string();
        if self.mixer.is_none() {
            self.fail(ResourceLoadFailed::NoOutput);
            return;
        }

        let (tx, rx) = mpsc::channel::<LoadResult>();
        let locator = locator.clone();
        let resolution = self.resolution;
        let spawned = thread::Builder::new()
            .name("zensync-load".to_string())
            .spawn(move || {
                let _ = tx.send(load_blocking(&locator, resolution));
            });

        match spawned {
            Ok(_) => {
                self.status = LoadStatus::Loading;
                self.pending = Some(rx);
            }
            Err(source) => self.fail(ResourceLoadFailed::Io {
                location: self.location.clone(),
                source,
            }),
        }
    }

    fn poll_load(&mut self) -> &LoadStatus {
        let outcome = match self.pending.as_ref().map(Receiver::try_recv) {
            None | Some(Err(TryRecvError::Empty)) => return &self.status,
            Some(Ok(result)) => result,
            Some(Err(TryRecvError::Disconnected)) => {
                Err(ResourceLoadFailed::Interrupted(self.location.clone()))
            }
        };

        self.pending = None;
        match outcome {
            Ok(audio) => {
                tracing::debug!(
                    "Loaded {} ({} peaks, {:?})",
                    self.location,
                    audio.peaks.len(),
                    audio.duration
                );
                self.audio = Some(audio);
                self.status = LoadStatus::Ready;
            }
            Err(err) => self.fail(err),
        }
        &self.status
    }

    fn status(&self) -> &LoadStatus {
        &self.status
    }

    fn play(&mut self) {
        if !self.status.is_ready() {
            return;
        }
        // A drained sink cannot be rewound; start over from the buffered bytes.
        if self.sink.as_ref().is_none_or(Sink::empty) {
            match self.new_sink() {
                Ok(sink) => self.sink = Some(sink),
                Err(err) => {
                    self.fail(err);
                    return;
                }
            }
        }
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn peaks(&self) -> &[f32] {
        self.audio.as_ref().map(|a| a.peaks.as_slice()).unwrap_or(&[])
    }

    fn duration(&self) -> Option<Duration> {
        self.audio.as_ref().and_then(|a| a.duration)
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .filter(|sink| !sink.empty())
            .map(Sink::get_pos)
            .unwrap_or(Duration::ZERO)
    }

    fn style(&self) -> &WaveformStyle {
        &self.style
    }
}
