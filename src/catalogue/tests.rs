use super::*;
use crate::library::{SourceBase, TrackRecord};
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

fn build(factory: &FakeFactory, records: Vec<TrackRecord>) -> Vec<RenderedItem<FakeHandle>> {
    let builder = ItemBuilder::new(
        factory,
        WaveformStyle::default(),
        SourceBase::Dir(PathBuf::from("/music")),
    );
    let mut items: Vec<_> = records.into_iter().map(|r| builder.build(r)).collect();
    for item in items.iter_mut() {
        item.handle_mut().poll_load();
    }
    items
}

fn titles(items: &[RenderedItem<FakeHandle>], order: &[ItemId]) -> Vec<String> {
    order.iter().map(|&i| items[i].record().title.clone()).collect()
}

fn visible_titles(items: &[RenderedItem<FakeHandle>], order: &[ItemId]) -> Vec<String> {
    order
        .iter()
        .filter(|&&i| items[i].is_visible())
        .map(|&i| items[i].record().title.clone())
        .collect()
}

fn playing_count(items: &[RenderedItem<FakeHandle>]) -> usize {
    items.iter().filter(|i| i.handle().is_playing()).count()
}

fn sample() -> Vec<TrackRecord> {
    vec![
        rec("B", "Vocal", "Calm"),
        rec("A", "Instrumental", "Calm"),
        rec("C", "vocal", "Energetic"),
    ]
}

#[test]
fn builder_resolves_locator_and_starts_loading() {
    let factory = FakeFactory::default();
    let builder = ItemBuilder::new(
        &factory,
        WaveformStyle::default(),
        SourceBase::Dir(PathBuf::from("/music")),
    );
    let item = builder.build(rec("Song", "", ""));
    assert!(item.is_visible());
    assert!(!item.is_indicated());
    assert!(!item.can_play());
    assert_eq!(
        item.handle().locator.as_ref().map(|l| l.to_string()),
        Some("/music/song.mp3".to_string())
    );
}

#[test]
fn builder_produces_independent_handles() {
    let factory = FakeFactory::default();
    let items = build(&factory, sample());
    let ids: Vec<usize> = items.iter().map(|i| i.handle().id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn sort_by_title_ascending_and_filter_by_mood() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());

    let mut view = ViewState::default();
    let order = apply(&mut items, &view);
    assert_eq!(titles(&items, &order), vec!["A", "B", "C"]);

    view.apply_event(ControlEvent::Filter(FilterPredicate::by_mood("Energetic")));
    let order = apply(&mut items, &view);
    assert_eq!(visible_titles(&items, &order), vec!["C"]);
}

#[test]
fn descending_order_inverts_comparison() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());
    let view = ViewState {
        sort_order: SortOrder::Desc,
        ..ViewState::default()
    };
    let order = apply(&mut items, &view);
    assert_eq!(titles(&items, &order), vec!["C", "B", "A"]);
}

#[test]
fn sorting_is_stable_for_equal_keys_in_both_directions() {
    let factory = FakeFactory::default();
    let records = vec![
        rec("one", "", "Calm"),
        rec("two", "", "Dark"),
        rec("three", "", "Calm"),
        rec("four", "", "Dark"),
    ];
    let mut items = build(&factory, records);

    let mut view = ViewState {
        sort_key: SortKey::Mood,
        ..ViewState::default()
    };
    let order = apply(&mut items, &view);
    assert_eq!(titles(&items, &order), vec!["one", "three", "two", "four"]);

    view.sort_order = SortOrder::Desc;
    let order = apply(&mut items, &view);
    assert_eq!(titles(&items, &order), vec!["two", "four", "one", "three"]);
}

#[test]
fn sorting_is_idempotent() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());
    let view = ViewState {
        sort_key: SortKey::Category,
        sort_order: SortOrder::Desc,
        ..ViewState::default()
    };
    let once = apply(&mut items, &view);
    let twice = apply(&mut items, &view);
    assert_eq!(once, twice);
}

#[test]
fn category_filter_is_case_normalized() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());
    let view = ViewState {
        filter: FilterPredicate::by_category("Vocal"),
        ..ViewState::default()
    };
    let order = apply(&mut items, &view);
    assert_eq!(visible_titles(&items, &order), vec!["B", "C"]);
}

#[test]
fn mood_filter_is_exact() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());
    let view = ViewState {
        filter: FilterPredicate::by_mood("calm"),
        ..ViewState::default()
    };
    let order = apply(&mut items, &view);
    assert!(visible_titles(&items, &order).is_empty());
}

#[test]
fn empty_mood_filter_shows_tracks_without_a_mood() {
    let factory = FakeFactory::default();
    let mut items = build(
        &factory,
        vec![rec("A", "", "Calm"), rec("B", "", ""), rec("C", "", "")],
    );
    let view = ViewState {
        filter: FilterPredicate::by_mood(""),
        ..ViewState::default()
    };
    let order = apply(&mut items, &view);
    assert_eq!(visible_titles(&items, &order), vec!["B", "C"]);
    assert_eq!(view.filter.label(), "mood: (none)");
    assert_eq!(FilterPredicate::by_mood("Calm").label(), "mood: Calm");
}

#[test]
fn unfiltering_restores_every_item_including_a_playing_one() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());
    let mut playback = PlaybackState::default();
    let mut view = ViewState::default();
    apply(&mut items, &view);

    // "A" (id 1) plays, then gets hidden by a mood filter.
    assert_eq!(
        request_toggle(&mut playback, &mut items, 1),
        ToggleOutcome::Started
    );
    view.apply_event(ControlEvent::Filter(FilterPredicate::by_mood("Energetic")));
    apply(&mut items, &view);
    assert!(!items[1].is_visible());
    assert!(items[1].handle().is_playing());
    assert!(items[1].is_indicated());

    view.apply_event(ControlEvent::Filter(FilterPredicate::All));
    let order = apply(&mut items, &view);
    assert_eq!(visible_titles(&items, &order), vec!["A", "B", "C"]);
    assert!(items[1].handle().is_playing());
    assert_eq!(playback.active(), Some(1));
}

#[test]
fn hidden_playing_item_is_paused_when_another_starts() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());
    let mut playback = PlaybackState::default();

    request_toggle(&mut playback, &mut items, 1);
    let view = ViewState {
        filter: FilterPredicate::by_mood("Energetic"),
        ..ViewState::default()
    };
    apply(&mut items, &view);

    request_toggle(&mut playback, &mut items, 2);
    assert!(!items[1].handle().is_playing());
    assert!(!items[1].is_indicated());
    assert!(items[2].handle().is_playing());
    assert_eq!(playing_count(&items), 1);
}

#[test]
fn toggle_pauses_other_before_playing_requested() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());
    let mut playback = PlaybackState::default();

    request_toggle(&mut playback, &mut items, 0);
    factory.log.borrow_mut().clear();
    request_toggle(&mut playback, &mut items, 2);

    assert_eq!(*factory.log.borrow(), vec![(0, "pause"), (2, "play")]);
    assert_eq!(playback.active(), Some(2));
}

#[test]
fn toggling_active_item_pauses_it_and_clears_state() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());
    let mut playback = PlaybackState::default();

    assert_eq!(request_toggle(&mut playback, &mut items, 0), ToggleOutcome::Started);
    assert_eq!(request_toggle(&mut playback, &mut items, 0), ToggleOutcome::Paused);
    assert_eq!(playback.active(), None);
    assert!(!items[0].is_indicated());
    assert_eq!(playing_count(&items), 0);
}

#[test]
fn exclusivity_holds_for_any_toggle_sequence() {
    let factory = FakeFactory::default();
    let records = (0..6).map(|i| rec(&format!("T{i}"), "", "")).collect();
    let mut items = build(&factory, records);
    let mut playback = PlaybackState::default();

    // Deterministic pseudo-random walk over item ids.
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    for _ in 0..500 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let id = (seed % items.len() as u64) as usize;
        request_toggle(&mut playback, &mut items, id);

        assert!(playing_count(&items) <= 1);
        let indicated: Vec<ItemId> = (0..items.len()).filter(|&i| items[i].is_indicated()).collect();
        match playback.active() {
            Some(active) => {
                assert_eq!(indicated, vec![active]);
                assert!(items[active].handle().is_playing());
            }
            None => assert!(indicated.is_empty()),
        }
    }
}

#[test]
fn failed_or_loading_items_cannot_be_toggled() {
    let factory = FakeFactory::default();
    let builder = ItemBuilder::new(
        &factory,
        WaveformStyle::default(),
        SourceBase::Dir(PathBuf::from("/music")),
    );
    let mut items = vec![
        builder.build(rec("Ok", "", "")),
        builder.build(TrackRecord {
            file_ref: "missing.mp3".into(),
            ..rec("Broken", "", "")
        }),
        builder.build(rec("Slow", "", "")),
    ];
    items[0].handle_mut().poll_load();
    items[1].handle_mut().poll_load();
    let mut playback = PlaybackState::default();

    request_toggle(&mut playback, &mut items, 0);
    assert_eq!(
        request_toggle(&mut playback, &mut items, 1),
        ToggleOutcome::Unavailable
    );
    assert_eq!(
        request_toggle(&mut playback, &mut items, 2),
        ToggleOutcome::Unavailable
    );
    assert_eq!(
        request_toggle(&mut playback, &mut items, 99),
        ToggleOutcome::Unavailable
    );
    // The playing sibling is untouched.
    assert!(items[0].handle().is_playing());
    assert_eq!(playback.active(), Some(0));
}

#[test]
fn refused_play_sets_no_indicator() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());
    let mut playback = PlaybackState::default();
    items[1].handle_mut().refuse_play = true;

    assert_eq!(
        request_toggle(&mut playback, &mut items, 1),
        ToggleOutcome::Unavailable
    );
    assert!(!items[1].is_indicated());
    assert_eq!(playback.active(), None);
    assert!(!items[1].can_play());
    assert_eq!(playing_count(&items), 0);
}

#[test]
fn sync_finished_clears_indicator_without_starting_anything() {
    let factory = FakeFactory::default();
    let mut items = build(&factory, sample());
    let mut playback = PlaybackState::default();

    request_toggle(&mut playback, &mut items, 0);
    assert!(!sync_finished(&mut playback, &mut items));

    items[0].handle_mut().finish();
    assert!(sync_finished(&mut playback, &mut items));
    assert_eq!(playback.active(), None);
    assert!(!items[0].is_indicated());
    assert_eq!(playing_count(&items), 0);
}

#[test]
fn title_sort_folds_case_and_accents_lowercase_first() {
    let factory = FakeFactory::default();
    let words = ["beta", "Alpha", "Ähre", "alpha", "Zeta", "straße"];
    let mut items = build(&factory, words.iter().map(|w| rec(w, "", "")).collect());
    let order = apply(&mut items, &ViewState::default());
    assert_eq!(
        titles(&items, &order),
        vec!["Ähre", "alpha", "Alpha", "beta", "straße", "Zeta"]
    );
}

#[test]
fn view_events_report_changes() {
    let mut view = ViewState::default();
    assert!(!view.apply_event(ControlEvent::SortKey(SortKey::Title)));
    assert!(view.apply_event(ControlEvent::SortKey(SortKey::Tempo)));
    assert!(view.apply_event(ControlEvent::SortOrder(SortOrder::Desc)));
    assert_eq!(view.sort_key, SortKey::Tempo);
    assert_eq!(view.sort_order, SortOrder::Desc);
}

#[test]
fn sort_keys_cycle_both_ways() {
    assert_eq!(SortKey::Title.next(), SortKey::Category);
    assert_eq!(SortKey::Tempo.next(), SortKey::Title);
    assert_eq!(SortKey::Title.prev(), SortKey::Tempo);
}

#[test]
fn filter_choices_list_all_categories_then_moods() {
    let choices = FilterChoices::new(
        &["instrumental".to_string(), "Vocal".to_string()],
        &["Calm".to_string(), "Energetic".to_string()],
    );
    assert_eq!(
        choices.as_slice(),
        &[
            FilterPredicate::All,
            FilterPredicate::ByCategory("instrumental".into()),
            FilterPredicate::ByCategory("vocal".into()),
            FilterPredicate::ByMood("Calm".into()),
            FilterPredicate::ByMood("Energetic".into()),
        ]
    );
    assert_eq!(
        choices.after(&FilterPredicate::ByMood("Energetic".into())),
        FilterPredicate::All
    );
    assert_eq!(
        choices.before(&FilterPredicate::All),
        FilterPredicate::ByMood("Energetic".into())
    );
    assert_eq!(
        choices.after(&FilterPredicate::ByMood("Unknown".into())),
        FilterPredicate::All
    );
}
