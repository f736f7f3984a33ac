use crate::library::{Locator, SourceBase, TrackRecord};
use crate::player::{HandleFactory, PlaybackHandle, WaveformStyle};

/// A track record paired with its own playback handle.
///
/// `visible` is owned by the ordering engine and `playing` by the playback
/// coordinator; nothing else writes either flag.
pub struct RenderedItem<H> {
    record: TrackRecord,
    handle: H,
    visible: bool,
    playing: bool,
}

impl<H> RenderedItem<H> {
    pub fn record(&self) -> &TrackRecord {
        &self.record
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The "playing" indicator shown on the item's control.
    pub fn is_indicated(&self) -> bool {
        self.playing
    }

    pub(super) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(super) fn set_indicator(&mut self, playing: bool) {
        self.playing = playing;
    }
}

impl<H: PlaybackHandle> RenderedItem<H> {
    /// Whether the item's play control is enabled.
    pub fn can_play(&self) -> bool {
        self.handle.status().is_ready()
    }
}

/// Turns track records into items, each with an independently loading handle.
pub struct ItemBuilder<'a, F> {
    factory: &'a F,
    style: WaveformStyle,
    base: SourceBase,
}

impl<'a, F: HandleFactory> ItemBuilder<'a, F> {
    pub fn new(factory: &'a F, style: WaveformStyle, base: SourceBase) -> Self {
        Self {
            factory,
            style,
            base,
        }
    }

    pub fn locate(&self, record: &TrackRecord) -> Locator {
        self.base.resolve(&record.file_ref)
    }

    /// Build one item. Loading starts immediately and never blocks the caller.
    pub fn build(&self, record: TrackRecord) -> RenderedItem<F::Handle> {
        let mut handle = self.factory.create(&self.style);
        let locator = self.locate(&record);
        tracing::debug!("Loading \"{}\" from {locator}", record.title);
        handle.load(&locator);
        RenderedItem {
            record,
            handle,
            visible: true,
            playing: false,
        }
    }
}
