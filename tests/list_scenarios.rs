//! Scenario tests for the conversation list engine.
//!
//! Each test drives the public `ConversationList` API the way a host would:
//! events carry the current `Instant`, and passes run on `tick` once the
//! debounce delay has elapsed.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use convlist::model::{ConversationId, ConversationSummary, SummaryPatch};
use convlist::view_state::content::{
    AvatarImage, AvatarLookup, AvatarResolver, AvatarSlot, FixedClock, NoAvatars,
};
use convlist::view_state::window::WindowCalculator;
use convlist::view_state::{
    ConversationList, EngineConfig, ItemIndex, LayoutOffset, RepresentationState,
    ViewportDimensions,
};
use std::time::{Duration, Instant};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// `count` conversations, newest first, one minute apart and all in the past.
fn history(count: u64) -> Vec<ConversationSummary> {
    (1..=count)
        .map(|i| {
            ConversationSummary::new(
                i,
                format!("chat {i}"),
                base() - ChronoDuration::minutes(i as i64),
            )
            .with_preview(format!("message {i}"))
        })
        .collect()
}

fn list(viewport_height: u32) -> ConversationList {
    ConversationList::new(
        EngineConfig::default(),
        ViewportDimensions::new(80, viewport_height),
        Box::new(NoAvatars),
        Box::new(FixedClock(base().fixed_offset())),
    )
}

/// Run passes until nothing is scheduled. Returns the time afterwards.
fn settle(list: &mut ConversationList, mut now: Instant) -> Instant {
    while let Some(wait) = list.time_until_pass(now) {
        now += wait;
        list.tick(now);
    }
    now
}

#[test]
fn window_for_first_screen_has_one_margin_row() {
    let window =
        WindowCalculator::with_margin(1).compute_uniform(LayoutOffset::new(0), 720, 72, 100);

    assert_eq!(window.visible(), 0..10);
    assert_eq!(window.expanded(), 0..11);
}

#[test]
fn window_is_clamped_to_item_count() {
    let window =
        WindowCalculator::with_margin(1).compute_uniform(LayoutOffset::new(0), 720, 72, 4);

    assert_eq!(window.expanded(), 0..4);
}

#[test]
fn new_message_lands_on_top_and_loads_immediately() {
    let t0 = Instant::now();
    let mut list = list(720);
    list.ingest(history(100), t0);
    let now = settle(&mut list, t0);

    let patch = SummaryPatch {
        display_name: Some("newcomer".into()),
        last_message_time: Some(base()),
        last_message_preview: Some("hello".into()),
        ..SummaryPatch::default()
    };
    let at = list.apply_upsert(ConversationId::new(500), patch, now);

    assert_eq!(at, Some(ItemIndex::new(0)));
    assert_eq!(list.count(), 101);
    assert_eq!(list.state_of(ItemIndex::new(0)), RepresentationState::FullyLoaded);
    let content = list.representation(ItemIndex::new(0)).unwrap().content().unwrap();
    assert_eq!(content.preview, "hello");
    // Everything below shifted down by one.
    assert_eq!(list.summary(ItemIndex::new(1)).unwrap().id, ConversationId::new(1));
}

#[test]
fn insert_starting_at_bottom_edge_waits_for_a_pass() {
    let t0 = Instant::now();
    let mut list = list(720);
    list.ingest(history(100), t0);
    let now = settle(&mut list, t0);

    // Between chat 10 (slot 9) and chat 11: slot 10, top edge at 720.
    let patch = SummaryPatch {
        display_name: Some("late".into()),
        last_message_time: Some(base() - ChronoDuration::seconds(10 * 60 + 30)),
        ..SummaryPatch::default()
    };
    let at = list.apply_upsert(ConversationId::new(500), patch, now);

    assert_eq!(at, Some(ItemIndex::new(10)));
    assert_eq!(list.item_rect(ItemIndex::new(10)).top, LayoutOffset::new(720));
    assert!(!list.visible_window().is_visible(ItemIndex::new(10)));
    assert_eq!(list.state_of(ItemIndex::new(10)), RepresentationState::Absent);

    // It sits in the margin, so the next pass loads it.
    settle(&mut list, now);
    assert_eq!(list.state_of(ItemIndex::new(10)), RepresentationState::FullyLoaded);
}

#[test]
fn content_only_update_stays_in_place() {
    let t0 = Instant::now();
    let mut list = list(720);
    list.ingest(history(100), t0);
    let now = settle(&mut list, t0);
    let id = list.summary(ItemIndex::new(5)).unwrap().id;
    let before: Vec<_> = list.all().iter().map(|s| s.id).collect();

    let patch = SummaryPatch {
        last_message_preview: Some("edited".into()),
        unread_count: Some(4),
        ..SummaryPatch::default()
    };
    let at = list.apply_upsert(id, patch, now);

    assert_eq!(at, Some(ItemIndex::new(5)));
    let after: Vec<_> = list.all().iter().map(|s| s.id).collect();
    assert_eq!(before, after);
    let content = list.representation(ItemIndex::new(5)).unwrap().content().unwrap();
    assert_eq!(content.preview, "edited");
}

#[test]
fn newer_message_moves_item_to_top() {
    let t0 = Instant::now();
    let mut list = list(720);
    list.ingest(history(100), t0);
    let now = settle(&mut list, t0);
    let id = list.summary(ItemIndex::new(7)).unwrap().id;

    let at = list.apply_upsert(id, SummaryPatch::new_message("ping", base(), 1), now);

    assert_eq!(at, Some(ItemIndex::new(0)));
    assert_eq!(list.position_of(id), Some(ItemIndex::new(0)));
    assert_eq!(list.state_of(ItemIndex::new(0)), RepresentationState::FullyLoaded);
}

#[test]
fn selecting_far_item_loads_it_until_a_pass_excludes_it() {
    let t0 = Instant::now();
    // 20 rows tall: visible 0..=19, expanded 0..=20.
    let mut list = list(20 * 72);
    list.ingest(history(100), t0);
    let now = settle(&mut list, t0);
    assert_eq!(list.visible_window().expanded(), 0..21);

    list.select_index(ItemIndex::new(50));

    assert_eq!(list.state_of(ItemIndex::new(50)), RepresentationState::FullyLoaded);
    assert!(list.representation(ItemIndex::new(50)).unwrap().is_selected());

    // Only the next pass evicts it; the selection itself persists.
    list.request_repaint(now);
    settle(&mut list, now);
    assert_eq!(list.state_of(ItemIndex::new(50)), RepresentationState::Absent);
    assert_eq!(list.current_selection(), Some(ItemIndex::new(50)));
}

#[test]
fn selection_follows_item_when_rows_are_inserted_above() {
    let t0 = Instant::now();
    let mut list = list(720);
    list.ingest(history(20), t0);
    list.select_index(ItemIndex::new(3));

    let patch = SummaryPatch {
        display_name: Some("newest".into()),
        last_message_time: Some(base()),
        ..SummaryPatch::default()
    };
    list.apply_upsert(ConversationId::new(99), patch, t0);

    assert_eq!(list.current_selection(), Some(ItemIndex::new(4)));
    assert!(list.representation(ItemIndex::new(4)).unwrap().is_selected());
}

#[test]
fn removing_selected_item_clears_selection() {
    let t0 = Instant::now();
    let mut list = list(720);
    list.ingest(history(20), t0);
    list.select_index(ItemIndex::new(2));
    let id = list.summary(ItemIndex::new(2)).unwrap().id;

    assert!(list.apply_remove(id, t0));

    assert_eq!(list.current_selection(), None);
    assert_eq!(list.count(), 19);
}

#[test]
fn invalid_update_removes_the_conversation() {
    let t0 = Instant::now();
    let mut list = list(720);
    list.ingest(history(10), t0);

    let patch = SummaryPatch {
        valid: Some(false),
        ..SummaryPatch::default()
    };
    let at = list.apply_upsert(ConversationId::new(3), patch, t0);

    assert_eq!(at, None);
    assert_eq!(list.count(), 9);
    assert_eq!(list.position_of(ConversationId::new(3)), None);
}

#[test]
fn scrolling_far_then_settling_loads_new_window_only() {
    let t0 = Instant::now();
    let mut list = list(720);
    list.ingest(history(20_000), t0);
    let now = settle(&mut list, t0);

    list.scroll_by(10_000 * 72, now);
    settle(&mut list, now);

    let window = list.visible_window();
    assert_eq!(window.expanded(), 9_999..10_011);
    assert!(list.loaded_set().iter().all(|&at| window.contains(ItemIndex::new(at))));
    assert_eq!(list.loaded_set().len(), window.len());
}

#[test]
fn large_scroll_uses_fast_budget() {
    let t0 = Instant::now();
    let config = EngineConfig {
        initial_eager_loads: 0,
        ..EngineConfig::default()
    };
    let mut list = ConversationList::new(
        config,
        ViewportDimensions::new(80, 720),
        Box::new(NoAvatars),
        Box::new(FixedClock(base().fixed_offset())),
    );
    list.ingest(history(1_000), t0);
    list.pass_now(t0);

    list.scroll_by(500 * 72, t0);
    assert!(list.is_fast_scrolling());
    let report = list.tick(t0 + Duration::from_millis(30)).unwrap();

    assert!(report.fast_scrolling);
    assert_eq!(report.promoted, 5);
    assert!(report.deferred > 0);
    // Deferred rows load on the following tick without further input.
    assert!(list.is_pass_pending());
    assert!(!list.is_fast_scrolling());
}

#[test]
fn scroll_events_are_debounced_into_one_pass() {
    let t0 = Instant::now();
    let mut list = list(720);
    list.ingest(history(200), t0);
    let now = settle(&mut list, t0);

    for step in 0..3u64 {
        list.scroll_by(36, now + Duration::from_millis(step * 10));
    }
    let last_event = now + Duration::from_millis(20);

    assert!(list.tick(last_event + Duration::from_millis(29)).is_none());
    assert!(list.tick(last_event + Duration::from_millis(30)).is_some());
}

fn assert_only_window_materialized(list: &ConversationList) {
    let window = list.visible_window();
    for at in (0..list.count()).map(ItemIndex::new) {
        let state = list.state_of(at);
        if window.contains(at) {
            assert_eq!(state, RepresentationState::FullyLoaded, "slot {}", at.get());
        } else {
            assert_eq!(state, RepresentationState::Absent, "slot {}", at.get());
        }
    }
}

#[test]
fn measured_heights_drive_the_window_through_inserts_and_removals() {
    let t0 = Instant::now();
    let config = EngineConfig {
        measured_heights: true,
        ..EngineConfig::default()
    };
    let mut list = ConversationList::new(
        config,
        ViewportDimensions::new(80, 720),
        Box::new(NoAvatars),
        Box::new(FixedClock(base().fixed_offset())),
    );
    list.ingest(history(30), t0);

    // Two tall rows fill the whole viewport: [0, 360) and [360, 720).
    assert!(list.set_item_height(ItemIndex::new(0), 360, t0));
    assert!(list.set_item_height(ItemIndex::new(1), 360, t0));
    assert!(!list.set_item_height(ItemIndex::new(1), 360, t0));
    let now = settle(&mut list, t0);

    assert_eq!(list.visible_window().visible(), 0..2);
    assert_eq!(list.visible_window().expanded(), 0..3);
    assert_only_window_materialized(&list);

    // A newcomer on top takes the estimated height and pushes the tall rows down.
    let patch = SummaryPatch {
        display_name: Some("newcomer".into()),
        last_message_time: Some(base()),
        ..SummaryPatch::default()
    };
    let at = list.apply_upsert(ConversationId::new(500), patch, now);
    assert_eq!(at, Some(ItemIndex::new(0)));
    assert_eq!(list.state_of(ItemIndex::new(0)), RepresentationState::FullyLoaded);
    assert_eq!(list.item_rect(ItemIndex::new(1)).top, LayoutOffset::new(72));
    assert_eq!(list.item_rect(ItemIndex::new(2)).height, 360);
    let now = settle(&mut list, now);

    assert_eq!(list.visible_window().visible(), 0..3);
    assert_eq!(list.visible_window().expanded(), 0..4);
    assert_only_window_materialized(&list);

    // Dropping the first tall row lets five short rows follow the second one.
    assert!(list.apply_remove(ConversationId::new(1), now));
    assert_eq!(list.summary(ItemIndex::new(1)).unwrap().id, ConversationId::new(2));
    assert_eq!(list.item_rect(ItemIndex::new(1)).height, 360);
    let now = settle(&mut list, now);

    assert_eq!(list.visible_window().visible(), 0..6);
    assert_eq!(list.visible_window().expanded(), 0..7);
    assert_only_window_materialized(&list);

    // 432 is the top of slot 2; the last covered unit 1151 lies in slot 11.
    list.scroll_by(432, now);
    settle(&mut list, now);

    assert_eq!(list.visible_window().visible(), 2..12);
    assert_eq!(list.visible_window().expanded(), 1..13);
    assert_only_window_materialized(&list);
    assert_eq!(list.total_height(), 72 + 360 + 28 * 72);
}

/// Resolver that answers `Pending` for everything.
struct SlowAvatars;

impl AvatarResolver for SlowAvatars {
    fn resolve(&mut self, _avatar_ref: &str) -> AvatarLookup {
        AvatarLookup::Pending
    }
}

#[test]
fn delivered_avatar_fills_every_row_that_uses_it() {
    let t0 = Instant::now();
    let mut list = ConversationList::new(
        EngineConfig::default(),
        ViewportDimensions::new(80, 720),
        Box::new(SlowAvatars),
        Box::new(FixedClock(base().fixed_offset())),
    );
    let items: Vec<_> = history(6)
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.with_avatar(if i % 2 == 0 { "even" } else { "odd" }))
        .collect();
    list.ingest(items, t0);

    let filled = list.deliver_avatar("even", AvatarImage::solid(4, [1, 2, 3, 255]));

    assert_eq!(filled, 3);
    let avatar = |at: usize| {
        list.representation(ItemIndex::new(at))
            .unwrap()
            .content()
            .unwrap()
            .avatar
            .clone()
    };
    assert!(matches!(avatar(0), AvatarSlot::Ready(_)));
    assert_eq!(avatar(1), AvatarSlot::Pending);
}
