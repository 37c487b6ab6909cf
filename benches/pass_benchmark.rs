//! Materialization pass benchmarks over a large list.
//!
//! A pass must cost the same whether the list holds a hundred conversations
//! or twenty thousand: only the expanded window and the materialized set are
//! touched.
//!
//! Run with: cargo bench --bench pass_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use convlist::model::{ConversationId, SummaryPatch};
use convlist::source::SyntheticSource;
use convlist::view_state::content::{FixedClock, NoAvatars};
use convlist::view_state::{ConversationList, EngineConfig, ViewportDimensions};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::time::Instant;

const LARGE_LIST: usize = 20_000;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Settled list of `count` synthetic conversations with a 10-row viewport.
fn settled_list(count: usize) -> (ConversationList, Instant) {
    let mut list = ConversationList::new(
        EngineConfig::default(),
        ViewportDimensions::new(80, 720),
        Box::new(NoAvatars),
        Box::new(FixedClock(base().fixed_offset())),
    );
    let mut now = Instant::now();
    list.ingest(SyntheticSource::new(7).conversations(count, base()), now);
    while let Some(wait) = list.time_until_pass(now) {
        now += wait;
        list.tick(now);
    }
    (list, now)
}

fn benchmark_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    for count in [1_000, LARGE_LIST] {
        let items = SyntheticSource::new(7).conversations(count, base());
        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter_batched(
                || items.clone(),
                |items| {
                    let mut list = ConversationList::new(
                        EngineConfig::default(),
                        ViewportDimensions::new(80, 720),
                        Box::new(NoAvatars),
                        Box::new(FixedClock(base().fixed_offset())),
                    );
                    list.ingest(items, Instant::now());
                    black_box(list.loaded_set().len())
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn benchmark_scroll_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_pass");
    for count in [1_000, LARGE_LIST] {
        group.bench_function(BenchmarkId::new("page_down", count), |b| {
            b.iter_batched_ref(
                || settled_list(count),
                |(list, now)| {
                    list.scroll_by(720, *now);
                    black_box(list.pass_now(*now))
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(BenchmarkId::new("idle_pass", count), |b| {
            b.iter_batched_ref(
                || settled_list(count),
                |(list, now)| black_box(list.pass_now(*now)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn benchmark_incoming_message(c: &mut Criterion) {
    c.bench_function("incoming_message_20k", |b| {
        b.iter_batched_ref(
            || settled_list(LARGE_LIST),
            |(list, now)| {
                // Oldest conversation jumps to the top.
                let last = list.count() - 1;
                let id = list
                    .summary(convlist::view_state::ItemIndex::new(last))
                    .map_or(ConversationId::new(1), |s| s.id);
                let patch =
                    SummaryPatch::new_message("ping", base() + ChronoDuration::minutes(1), 1);
                black_box(list.apply_upsert(id, patch, *now))
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(std::time::Duration::from_secs(5));
    targets =
        benchmark_ingest,
        benchmark_scroll_pass,
        benchmark_incoming_message
}

criterion_main!(benches);
