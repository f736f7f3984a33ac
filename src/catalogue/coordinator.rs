use crate::player::PlaybackHandle;

use super::item::RenderedItem;

/// Position of an item in the session's item collection.
pub type ItemId = usize;

/// Which item, if any, is currently playing.
///
/// This is a lookup key only. The item owns its handle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    active: Option<ItemId>,
}

impl PlaybackState {
    pub fn active(&self) -> Option<ItemId> {
        self.active
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    Paused,
    /// The item is not loaded, does not exist, or refused to start.
    Unavailable,
}

/// Toggle playback of `id`, pausing any other active item first.
pub fn request_toggle<H: PlaybackHandle>(
    state: &mut PlaybackState,
    items: &mut [RenderedItem<H>],
    id: ItemId,
) -> ToggleOutcome {
    if !items.get(id).is_some_and(RenderedItem::can_play) {
        return ToggleOutcome::Unavailable;
    }

    // Pause the other item before looking at this one.
    if let Some(active) = state.active.filter(|&active| active != id) {
        if let Some(other) = items.get_mut(active) {
            other.handle_mut().pause();
            other.set_indicator(false);
        }
        state.active = None;
    }

    let item = &mut items[id];
    if item.handle().is_playing() {
        item.handle_mut().pause();
        item.set_indicator(false);
        state.active = None;
        tracing::debug!("Paused \"{}\"", item.record().title);
        ToggleOutcome::Paused
    } else {
        item.handle_mut().play();
        // The output can refuse at this point even though the load succeeded.
        if !item.handle().is_playing() {
            tracing::warn!("Could not start \"{}\"", item.record().title);
            return ToggleOutcome::Unavailable;
        }
        item.set_indicator(true);
        state.active = Some(id);
        tracing::debug!("Playing \"{}\"", item.record().title);
        ToggleOutcome::Started
    }
}

/// Clear the indicator of an active item whose audio ran out.
///
/// Returns `true` when something was cleared. Nothing else is started.
pub fn sync_finished<H: PlaybackHandle>(
    state: &mut PlaybackState,
    items: &mut [RenderedItem<H>],
) -> bool {
    let Some(id) = state.active else {
        return false;
    };
    match items.get_mut(id) {
        Some(item) if item.handle().is_playing() => false,
        Some(item) => {
            item.set_indicator(false);
            state.active = None;
            tracing::debug!("Finished \"{}\"", item.record().title);
            true
        }
        None => {
            state.active = None;
            true
        }
    }
}
