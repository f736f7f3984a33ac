//! The catalogue engine: rendered items, single-active playback, and the
//! sort/filter view over them.
//!
//! All state here is mutated from the event-loop thread only. `ViewState`
//! and `PlaybackState` are plain values passed by reference into the
//! ordering engine and the playback coordinator.

mod coordinator;
mod events;
mod item;
mod view;

pub use coordinator::{ItemId, PlaybackState, ToggleOutcome, request_toggle, sync_finished};
pub use events::{ControlEvent, FilterChoices};
pub use item::{ItemBuilder, RenderedItem};
pub use view::{FilterPredicate, SortKey, SortOrder, ViewState, apply};

#[cfg(test)]
mod tests;
