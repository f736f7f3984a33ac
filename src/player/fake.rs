//! In-memory `PlaybackHandle` for exercising the catalogue without audio.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::library::Locator;

use super::handle::{HandleFactory, LoadStatus, PlaybackHandle};
use super::waveform::WaveformStyle;

/// Every play/pause issued to any handle of one factory, in program order.
pub(crate) type CallLog = Rc<RefCell<Vec<(usize, &'static str)>>>;

pub(crate) struct FakeHandle {
    pub id: usize,
    pub status: LoadStatus,
    pub playing: bool,
    pub locator: Option<Locator>,
    /// Make the next `play` fail the handle instead of starting it.
    pub refuse_play: bool,
    log: CallLog,
    style: WaveformStyle,
}

impl FakeHandle {
    /// Simulate the audio running out while playing.
    pub fn finish(&mut self) {
        self.playing = false;
    }
}

impl PlaybackHandle for FakeHandle {
    fn load(&mut self, locator: &Locator) {
        self.locator = Some(locator.clone());
        self.status = LoadStatus::Loading;
    }

    /// Loads settle on the first poll; locators mentioning "missing" fail.
    fn poll_load(&mut self) -> &LoadStatus {
        if self.status == LoadStatus::Loading {
            let failed = self
                .locator
                .as_ref()
                .is_some_and(|l| l.to_string().contains("missing"));
            self.status = if failed {
                LoadStatus::Failed("not found".to_string())
            } else {
                LoadStatus::Ready
            };
        }
        &self.status
    }

    fn status(&self) -> &LoadStatus {
        &self.status
    }

    fn play(&mut self) {
        self.log.borrow_mut().push((self.id, "play"));
        if self.refuse_play {
            self.status = LoadStatus::Failed("no audio output device".to_string());
        } else if self.status.is_ready() {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.log.borrow_mut().push((self.id, "pause"));
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn peaks(&self) -> &[f32] {
        &[]
    }

    fn duration(&self) -> Option<Duration> {
        None
    }

    fn position(&self) -> Duration {
        Duration::ZERO
    }

    fn style(&self) -> &WaveformStyle {
        &self.style
    }
}

#[derive(Default)]
pub(crate) struct FakeFactory {
    next_id: Cell<usize>,
    pub log: CallLog,
}

impl HandleFactory for FakeFactory {
    type Handle = FakeHandle;

    fn create(&self, style: &WaveformStyle) -> FakeHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        FakeHandle {
            id,
            status: LoadStatus::Loading,
            playing: false,
            locator: None,
            refuse_play: false,
            log: self.log.clone(),
            style: style.clone(),
        }
    }
}
