//! Application model: the catalogue session as seen by the UI and runtime.
//!
//! `App` owns every rendered item, the view selection and the playback
//! coordinator state. All mutation happens on the event-loop thread.

use crate::catalogue::{
    self, ControlEvent, FilterChoices, FilterPredicate, ItemBuilder, ItemId, PlaybackState,
    RenderedItem, SortOrder, ToggleOutcome, ViewState,
};
use crate::library::{SourceUnavailable, TrackRecord, derive_category_options, derive_mood_options};
use crate::player::{HandleFactory, LoadStatus, PlaybackHandle};

/// Where the session is in obtaining its catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueState {
    Loading,
    Ready,
    /// The fetch failed; the list stays empty for the rest of the session.
    Unavailable(String),
}

/// The main application model.
pub struct App<H> {
    pub items: Vec<RenderedItem<H>>,
    pub view: ViewState,
    pub playback: PlaybackState,
    /// Every item id in display order, hidden ones included.
    order: Vec<ItemId>,
    pub selected: ItemId,
    pub filter_choices: FilterChoices,
    pub mood_options: Vec<String>,
    pub category_options: Vec<String>,
    pub catalogue: CatalogueState,
    pub source_label: String,
    pub metadata_window: bool,
    pub status_message: Option<String>,
}

impl<H> App<H> {
    /// An empty session waiting for its catalogue.
    pub fn new(view: ViewState, source_label: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            view,
            playback: PlaybackState::default(),
            order: Vec::new(),
            selected: 0,
            filter_choices: FilterChoices::default(),
            mood_options: Vec::new(),
            category_options: Vec::new(),
            catalogue: CatalogueState::Loading,
            source_label: source_label.into(),
            metadata_window: false,
            status_message: None,
        }
    }

    /// Install the fetched catalogue. Runs once per session.
    ///
    /// Each record becomes an item whose audio starts loading right away.
    /// `category_filters` seeds the filter selector; when empty the
    /// categories are taken from the records.
    pub fn on_catalogue_loaded<F>(
        &mut self,
        result: Result<Vec<TrackRecord>, SourceUnavailable>,
        builder: &ItemBuilder<'_, F>,
        category_filters: &[String],
    ) where
        F: HandleFactory<Handle = H>,
    {
        match result {
            Ok(records) => {
                tracing::info!("Catalogue from {} has {} tracks", self.source_label, records.len());
                self.mood_options = derive_mood_options(&records);
                self.category_options = if category_filters.is_empty() {
                    derive_category_options(&records)
                } else {
                    category_filters.to_vec()
                };
                self.filter_choices = FilterChoices::new(&self.category_options, &self.mood_options);
                self.items = records.into_iter().map(|r| builder.build(r)).collect();
                self.catalogue = CatalogueState::Ready;
            }
            Err(err) => {
                tracing::error!("Catalogue unavailable: {err}");
                self.items.clear();
                self.catalogue = CatalogueState::Unavailable(err.to_string());
            }
        }
        self.reconcile();
        self.select_first();
    }

    pub fn is_loading(&self) -> bool {
        self.catalogue == CatalogueState::Loading
    }

    /// Fold a view control change into the session and recompute the view.
    ///
    /// Ignored until the catalogue has arrived. Returns `true` if the view changed.
    pub fn handle_control(&mut self, event: ControlEvent) -> bool {
        if self.is_loading() {
            return false;
        }
        let changed = self.view.apply_event(event);
        if changed {
            self.reconcile();
        }
        changed
    }

    /// Recompute order and visibility, then keep the cursor on a visible item.
    pub fn reconcile(&mut self) {
        self.order = catalogue::apply(&mut self.items, &self.view);
        self.ensure_selected_visible();
    }

    /// Visible item ids in display order.
    pub fn display_indices(&self) -> Vec<ItemId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| self.items[id].is_visible())
            .collect()
    }

    pub fn hidden_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_visible()).count()
    }

    pub fn selected_item(&self) -> Option<&RenderedItem<H>> {
        self.items.get(self.selected).filter(|item| item.is_visible())
    }

    pub fn now_playing(&self) -> Option<&RenderedItem<H>> {
        self.playback.active().and_then(|id| self.items.get(id))
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn cycle_sort_key(&mut self, forward: bool) -> bool {
        let key = if forward {
            self.view.sort_key.next()
        } else {
            self.view.sort_key.prev()
        };
        self.handle_control(ControlEvent::SortKey(key))
    }

    pub fn toggle_sort_order(&mut self) -> bool {
        let order: SortOrder = self.view.sort_order.toggled();
        self.handle_control(ControlEvent::SortOrder(order))
    }

    pub fn cycle_filter(&mut self, forward: bool) -> bool {
        let filter = if forward {
            self.filter_choices.after(&self.view.filter)
        } else {
            self.filter_choices.before(&self.view.filter)
        };
        self.handle_control(ControlEvent::Filter(filter))
    }

    pub fn show_all(&mut self) -> bool {
        self.handle_control(ControlEvent::Filter(FilterPredicate::All))
    }

    /// Move the cursor to the first visible item if it sits on a hidden one.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        match display.first() {
            None => self.selected = 0,
            Some(&first) if !display.contains(&self.selected) => self.selected = first,
            Some(_) => {}
        }
    }

    fn step(&mut self, forward: bool) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        let len = display.len();
        self.selected = match display.iter().position(|&id| id == self.selected) {
            Some(pos) if forward => display[(pos + 1) % len],
            Some(pos) => display[(pos + len - 1) % len],
            None => display[0],
        };
    }

    /// Move selection to the next visible item, wrapping.
    pub fn next(&mut self) {
        self.step(true);
    }

    /// Move selection to the previous visible item, wrapping.
    pub fn prev(&mut self) {
        self.step(false);
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }
}

impl<H: PlaybackHandle> App<H> {
    /// Toggle playback of the selected item through the coordinator.
    pub fn toggle_selected(&mut self) -> ToggleOutcome {
        if self.selected_item().is_none() {
            return ToggleOutcome::Unavailable;
        }
        let outcome = catalogue::request_toggle(&mut self.playback, &mut self.items, self.selected);
        if outcome == ToggleOutcome::Unavailable {
            let reason = match self.items[self.selected].handle().status() {
                LoadStatus::Loading => "still loading".to_string(),
                LoadStatus::Failed(reason) => reason.clone(),
                LoadStatus::Ready => "not playable".to_string(),
            };
            self.set_status(format!("Cannot play: {reason}"));
        }
        outcome
    }

    /// Absorb finished background loads. Returns `true` if any item settled.
    pub fn poll_loads(&mut self) -> bool {
        let mut settled = false;
        for item in &mut self.items {
            if matches!(item.handle().status(), LoadStatus::Loading) {
                settled |= !matches!(item.handle_mut().poll_load(), LoadStatus::Loading);
            }
        }
        settled
    }

    /// Clear the indicator once the active track has played out.
    pub fn sync_playback(&mut self) -> bool {
        catalogue::sync_finished(&mut self.playback, &mut self.items)
    }

    /// Items still loading, for the status line.
    pub fn loading_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.handle().status(), LoadStatus::Loading))
            .count()
    }
}
