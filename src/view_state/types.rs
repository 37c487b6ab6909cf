//! Core view-state newtypes

/// Position of a slot in the ordered list. 0-indexed.
///
/// Positions are not identities: inserting or removing an item shifts
/// every later position by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ItemIndex(usize);

impl ItemIndex {
    /// Create a new ItemIndex from a raw 0-based value.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Get the next index.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Get the previous index, saturating at 0.
    pub fn prev(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl From<usize> for ItemIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Absolute vertical offset from the top of the list, in layout units
/// (pixels for a pixel surface, scaled rows for a terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LayoutOffset(u64);

impl LayoutOffset {
    /// Create a new offset from a raw value.
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Get the raw value.
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Move by a signed delta, saturating at 0 and at `max`.
    pub fn offset_by(&self, delta: i64, max: u64) -> Self {
        let moved = if delta < 0 {
            self.0.saturating_sub(delta.unsigned_abs())
        } else {
            self.0.saturating_add(delta as u64)
        };
        Self(moved.min(max))
    }
}

/// Viewport extent in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportDimensions {
    /// Width (only used by the rendering collaborator).
    pub width: u32,
    /// Height; drives windowing.
    pub height: u32,
}

impl ViewportDimensions {
    /// Create new viewport dimensions.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
