use super::*;
use crate::catalogue::{ControlEvent, FilterPredicate, ItemBuilder, SortKey, ToggleOutcome, ViewState};
use crate::library::{SourceBase, SourceUnavailable, TrackRecord};
use crate::player::fake::{FakeFactory, FakeHandle};
use crate::player::{PlaybackHandle, WaveformStyle};
use std::path::PathBuf;

fn rec(title: &str, category: &str, mood: &str) -> TrackRecord {
    TrackRecord {
        title: title.into(),
        file_ref: format!("{}.mp3", title.to_lowercase()),
        category: category.into(),
        mood: mood.into(),
        ..TrackRecord::default()
    }
}

fn loaded(factory: &FakeFactory, records: Vec<TrackRecord>, categories: &[String]) -> App<FakeHandle> {
    let builder = ItemBuilder::new(
        factory,
        WaveformStyle::default(),
        SourceBase::Dir(PathBuf::from("/music")),
    );
    let mut app = App::new(ViewState::default(), "/music");
    app.on_catalogue_loaded(Ok(records), &builder, categories);
    app
}

fn visible(app: &App<FakeHandle>) -> Vec<String> {
    app.display_indices()
        .into_iter()
        .map(|id| app.items[id].record().title.clone())
        .collect()
}

fn sample() -> Vec<TrackRecord> {
    vec![
        rec("B", "Vocal", "Calm"),
        rec("A", "Instrumental", "Calm"),
        rec("C", "vocal", "Energetic"),
    ]
}

#[test]
fn loaded_catalogue_is_sorted_and_selects_first_visible() {
    let factory = FakeFactory::default();
    let app = loaded(&factory, sample(), &[]);
    assert_eq!(app.catalogue, CatalogueState::Ready);
    assert_eq!(visible(&app), vec!["A", "B", "C"]);
    assert_eq!(app.selected_item().unwrap().record().title, "A");
    assert_eq!(app.mood_options, vec!["Calm", "Energetic"]);
    assert_eq!(app.category_options, vec!["vocal", "instrumental"]);
}

#[test]
fn configured_categories_seed_the_filter_choices() {
    let factory = FakeFactory::default();
    let app = loaded(&factory, sample(), &["instrumental".into(), "vocal".into()]);
    assert_eq!(
        app.filter_choices.as_slice(),
        &[
            FilterPredicate::All,
            FilterPredicate::by_category("instrumental"),
            FilterPredicate::by_category("vocal"),
            FilterPredicate::by_mood("Calm"),
            FilterPredicate::by_mood("Energetic"),
        ]
    );
}

#[test]
fn unavailable_source_leaves_an_empty_list_and_controls_are_safe() {
    let factory = FakeFactory::default();
    let builder = ItemBuilder::new(
        &factory,
        WaveformStyle::default(),
        SourceBase::Dir(PathBuf::from("/music")),
    );
    let mut app: App<FakeHandle> = App::new(ViewState::default(), "/music");
    app.on_catalogue_loaded(Err(SourceUnavailable::Interrupted), &builder, &[]);

    assert!(matches!(app.catalogue, CatalogueState::Unavailable(_)));
    assert!(app.display_indices().is_empty());

    app.handle_control(ControlEvent::SortKey(SortKey::Mood));
    app.handle_control(ControlEvent::Filter(FilterPredicate::by_mood("Calm")));
    app.cycle_filter(true);
    app.cycle_filter(false);
    app.cycle_sort_key(false);
    app.toggle_sort_order();
    app.show_all();
    app.next();
    app.prev();
    app.select_first();
    app.select_last();
    assert_eq!(app.toggle_selected(), ToggleOutcome::Unavailable);
    assert!(!app.poll_loads());
    assert!(!app.sync_playback());
    assert!(app.selected_item().is_none());
    assert!(app.display_indices().is_empty());
}

#[test]
fn controls_are_ignored_while_the_catalogue_is_loading() {
    let mut app: App<FakeHandle> = App::new(ViewState::default(), "/music");
    assert!(app.is_loading());
    assert!(!app.handle_control(ControlEvent::SortKey(SortKey::Mood)));
    assert_eq!(app.view.sort_key, SortKey::Title);
}

#[test]
fn mood_filter_hides_items_and_moves_cursor() {
    let factory = FakeFactory::default();
    let mut app = loaded(&factory, sample(), &[]);
    app.select_first();
    assert!(app.handle_control(ControlEvent::Filter(FilterPredicate::by_mood("Energetic"))));
    assert_eq!(visible(&app), vec!["C"]);
    assert_eq!(app.hidden_count(), 2);
    assert_eq!(app.selected_item().unwrap().record().title, "C");

    assert!(app.show_all());
    assert_eq!(visible(&app), vec!["A", "B", "C"]);
    assert!(!app.show_all());
}

#[test]
fn toggling_waits_for_load_then_plays_exclusively() {
    let factory = FakeFactory::default();
    let mut app = loaded(&factory, sample(), &[]);
    app.select_first();
    assert_eq!(app.toggle_selected(), ToggleOutcome::Unavailable);
    assert!(app.status_message.as_deref().unwrap().contains("loading"));
    assert_eq!(app.loading_count(), 3);

    assert!(app.poll_loads());
    assert!(!app.poll_loads());
    assert_eq!(app.loading_count(), 0);

    assert_eq!(app.toggle_selected(), ToggleOutcome::Started);
    assert_eq!(app.now_playing().unwrap().record().title, "A");

    app.next();
    assert_eq!(app.toggle_selected(), ToggleOutcome::Started);
    assert_eq!(app.now_playing().unwrap().record().title, "B");
    let playing = app.items.iter().filter(|i| i.handle().is_playing()).count();
    assert_eq!(playing, 1);

    assert_eq!(app.toggle_selected(), ToggleOutcome::Paused);
    assert!(app.now_playing().is_none());
}

#[test]
fn failed_item_reports_reason_in_status() {
    let factory = FakeFactory::default();
    let mut app = loaded(&factory, vec![rec("Missing", "", "")], &[]);
    app.poll_loads();
    assert_eq!(app.toggle_selected(), ToggleOutcome::Unavailable);
    assert_eq!(app.status_message.as_deref(), Some("Cannot play: not found"));
}

#[test]
fn refused_play_leaves_nothing_playing_and_explains_why() {
    let factory = FakeFactory::default();
    let mut app = loaded(&factory, sample(), &[]);
    app.poll_loads();
    let selected = app.selected;
    app.items[selected].handle_mut().refuse_play = true;

    assert_eq!(app.toggle_selected(), ToggleOutcome::Unavailable);
    assert!(app.now_playing().is_none());
    assert!(!app.items[selected].is_indicated());
    assert_eq!(
        app.status_message.as_deref(),
        Some("Cannot play: no audio output device")
    );
}

#[test]
fn playing_item_keeps_playing_while_filtered_out() {
    let factory = FakeFactory::default();
    let mut app = loaded(&factory, sample(), &[]);
    app.poll_loads();
    app.select_first();
    app.toggle_selected();

    app.handle_control(ControlEvent::Filter(FilterPredicate::by_mood("Energetic")));
    let playing = app.now_playing().unwrap();
    assert!(!playing.is_visible());
    assert!(playing.handle().is_playing());

    app.show_all();
    assert!(app.now_playing().unwrap().is_visible());
}

#[test]
fn finished_track_clears_the_indicator() {
    let factory = FakeFactory::default();
    let mut app = loaded(&factory, sample(), &[]);
    app.poll_loads();
    app.toggle_selected();
    let id = app.playback.active().unwrap();

    assert!(!app.sync_playback());
    app.items[id].handle_mut().finish();
    assert!(app.sync_playback());
    assert!(!app.items[id].is_indicated());
    assert!(app.now_playing().is_none());
}

#[test]
fn navigation_wraps_over_visible_items() {
    let factory = FakeFactory::default();
    let mut app = loaded(&factory, sample(), &[]);
    app.select_first();
    app.prev();
    assert_eq!(app.selected_item().unwrap().record().title, "C");
    app.next();
    assert_eq!(app.selected_item().unwrap().record().title, "A");
    app.select_last();
    assert_eq!(app.selected_item().unwrap().record().title, "C");
}

#[test]
fn sort_controls_cycle_and_reorder() {
    let factory = FakeFactory::default();
    let mut app = loaded(&factory, sample(), &[]);
    assert!(app.toggle_sort_order());
    assert_eq!(visible(&app), vec!["C", "B", "A"]);
    assert!(app.cycle_sort_key(true));
    assert_eq!(app.view.sort_key, SortKey::Category);
    assert_eq!(visible(&app), vec!["B", "C", "A"]);
}

#[test]
fn metadata_window_toggles() {
    let mut app: App<FakeHandle> = App::new(ViewState::default(), "x");
    app.toggle_metadata_window();
    assert!(app.metadata_window);
    app.toggle_metadata_window();
    assert!(!app.metadata_window);
}
