//! Per-pass load budget.

/// Default promotions per pass while scrolling is settled.
pub const NORMAL_BUDGET: usize = 10;

/// Default promotions per pass while the user is flying past rows.
///
/// Lower than [`NORMAL_BUDGET`]: rows skimmed at speed should not pay the
/// full resolution cost.
pub const FAST_BUDGET: usize = 5;

/// How many items one pass may promote to fully loaded.
///
/// Stateless: the fast-scroll flag is owned by the debouncer and passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Deserialize), serde(default))]
pub struct RenderBudget {
    /// Limit when scrolling is settled.
    pub normal: usize,
    /// Limit while fast scrolling.
    pub fast: usize,
}

impl Default for RenderBudget {
    fn default() -> Self {
        Self {
            normal: NORMAL_BUDGET,
            fast: FAST_BUDGET,
        }
    }
}

impl RenderBudget {
    /// Budget with explicit limits.
    pub const fn new(normal: usize, fast: usize) -> Self {
        Self { normal, fast }
    }

    /// Promotions allowed in the upcoming pass.
    pub fn max_loads_per_pass(&self, is_fast_scrolling: bool) -> usize {
        if is_fast_scrolling {
            self.fast
        } else {
            self.normal
        }
    }
}
