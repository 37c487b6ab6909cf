//! Debounced pass scheduling.
//!
//! `Idle → Pending → (fires) → Idle`. Every scroll, resize or repaint request
//! restarts a single-shot timer; only the latest request survives. Time is
//! passed in explicitly so the state machine stays deterministic under test.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::trace;

/// Default delay between the last event and the pass.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(30);

/// Timing and fast-scroll thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Quiet period before a pass fires.
    pub delay: Duration,
    /// A single scroll of at least this many layout units counts as fast.
    pub fast_scroll_delta: u64,
    /// This many scroll events inside `fast_scroll_window` count as fast.
    pub fast_scroll_burst: usize,
    /// Sliding window for burst detection.
    pub fast_scroll_window: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DEBOUNCE,
            fast_scroll_delta: 216,
            fast_scroll_burst: 5,
            fast_scroll_window: Duration::from_millis(120),
        }
    }
}

/// Timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// No pass scheduled.
    Idle,
    /// A pass fires at `deadline`.
    Pending {
        /// When the pass is due.
        deadline: Instant,
    },
}

/// A pass the debouncer wants run now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassTrigger {
    /// Whether the pass should use the fast-scroll budget.
    pub fast_scrolling: bool,
}

/// Coalesces scroll/resize/repaint events into materialization passes.
#[derive(Debug, Clone)]
pub struct ScrollDebouncer {
    config: DebounceConfig,
    state: DebounceState,
    fast_scrolling: bool,
    recent_scrolls: VecDeque<Instant>,
}

impl Default for ScrollDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

impl ScrollDebouncer {
    /// Create an idle debouncer.
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            state: DebounceState::Idle,
            fast_scrolling: false,
            recent_scrolls: VecDeque::new(),
        }
    }

    /// Thresholds in use.
    pub fn config(&self) -> DebounceConfig {
        self.config
    }

    /// Current timer state.
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Whether a pass is scheduled.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    /// Whether the next pass will use the fast-scroll budget.
    pub fn is_fast_scrolling(&self) -> bool {
        self.fast_scrolling
    }

    /// A scroll of `delta` layout units happened.
    ///
    /// Large deltas and rapid bursts mark the upcoming pass as fast.
    pub fn on_scroll(&mut self, delta: i64, now: Instant) {
        while let Some(&oldest) = self.recent_scrolls.front() {
            if now.saturating_duration_since(oldest) > self.config.fast_scroll_window {
                self.recent_scrolls.pop_front();
            } else {
                break;
            }
        }
        self.recent_scrolls.push_back(now);

        let big_jump = delta.unsigned_abs() >= self.config.fast_scroll_delta;
        let burst = self.recent_scrolls.len() >= self.config.fast_scroll_burst;
        if (big_jump || burst) && !self.fast_scrolling {
            trace!(delta, burst = self.recent_scrolls.len(), "Fast scrolling");
            self.fast_scrolling = true;
        }
        self.arm(now);
    }

    /// The viewport was resized.
    pub fn on_resize(&mut self, now: Instant) {
        self.arm(now);
    }

    /// The rendering collaborator asked for a repaint.
    pub fn on_repaint(&mut self, now: Instant) {
        self.arm(now);
    }

    /// Schedule a pass without any triggering event (e.g. after data changes).
    pub fn request(&mut self, now: Instant) {
        self.arm(now);
    }

    /// Fire if the deadline has passed. Transitions to `Idle` when it does.
    ///
    /// The fast flag stays set until [`settle`](Self::settle).
    pub fn poll(&mut self, now: Instant) -> Option<PassTrigger> {
        match self.state {
            DebounceState::Pending { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                Some(PassTrigger {
                    fast_scrolling: self.fast_scrolling,
                })
            }
            _ => None,
        }
    }

    /// Time left before the pending pass is due; `None` when idle.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::Pending { deadline } => Some(deadline.saturating_duration_since(now)),
        }
    }

    /// Drop the pending pass, if any.
    pub fn cancel(&mut self) {
        self.state = DebounceState::Idle;
    }

    /// Clear the fast-scroll flag once a pass has consumed it.
    pub fn settle(&mut self) {
        self.fast_scrolling = false;
    }

    fn arm(&mut self, now: Instant) {
        self.state = DebounceState::Pending {
            deadline: now + self.config.delay,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn starts_idle() {
        let debouncer = ScrollDebouncer::default();
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert_eq!(debouncer.time_until_fire(Instant::now()), None);
    }

    #[test]
    fn fires_once_after_delay() {
        let t0 = Instant::now();
        let mut debouncer = ScrollDebouncer::default();

        debouncer.on_resize(t0);

        assert_eq!(debouncer.poll(t0 + ms(29)), None);
        assert_eq!(
            debouncer.poll(t0 + ms(30)),
            Some(PassTrigger {
                fast_scrolling: false
            })
        );
        assert_eq!(debouncer.poll(t0 + ms(60)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn new_events_restart_the_timer() {
        let t0 = Instant::now();
        let mut debouncer = ScrollDebouncer::default();

        debouncer.on_scroll(10, t0);
        debouncer.on_repaint(t0 + ms(20));

        assert_eq!(debouncer.poll(t0 + ms(40)), None);
        assert_eq!(debouncer.time_until_fire(t0 + ms(40)), Some(ms(10)));
        assert!(debouncer.poll(t0 + ms(50)).is_some());
    }

    #[test]
    fn large_delta_is_fast() {
        let t0 = Instant::now();
        let mut debouncer = ScrollDebouncer::default();

        debouncer.on_scroll(-216, t0);

        assert!(debouncer.is_fast_scrolling());
        assert_eq!(debouncer.poll(t0 + ms(30)).map(|t| t.fast_scrolling), Some(true));
    }

    #[test]
    fn small_sparse_scrolls_are_not_fast() {
        let t0 = Instant::now();
        let mut debouncer = ScrollDebouncer::default();

        for i in 0..10 {
            debouncer.on_scroll(36, t0 + ms(i * 200));
        }

        assert!(!debouncer.is_fast_scrolling());
    }

    #[test]
    fn burst_of_small_scrolls_is_fast() {
        let t0 = Instant::now();
        let mut debouncer = ScrollDebouncer::default();

        for i in 0..4 {
            debouncer.on_scroll(36, t0 + ms(i * 20));
        }
        assert!(!debouncer.is_fast_scrolling());

        debouncer.on_scroll(36, t0 + ms(80));
        assert!(debouncer.is_fast_scrolling());
    }

    #[test]
    fn fast_flag_is_sticky_until_settled() {
        let t0 = Instant::now();
        let mut debouncer = ScrollDebouncer::default();
        debouncer.on_scroll(1000, t0);

        debouncer.on_resize(t0 + ms(10));
        assert!(debouncer.is_fast_scrolling());

        debouncer.poll(t0 + ms(40));
        assert!(debouncer.is_fast_scrolling());

        debouncer.settle();
        assert!(!debouncer.is_fast_scrolling());
    }
}
