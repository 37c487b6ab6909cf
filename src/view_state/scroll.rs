//! Scroll position and viewport.

use super::layout::SlotRect;
use super::types::{ItemIndex, LayoutOffset, ViewportDimensions};

/// Where the viewport should sit.
///
/// Every variant resolves to an offset clamped to
/// `[0, max(0, total_height - viewport_height)]`, so the viewport is never
/// scrolled past the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPosition {
    /// First slot at the top.
    #[default]
    Top,
    /// Last slot at the bottom.
    Bottom,
    /// Absolute offset.
    AtOffset(LayoutOffset),
    /// Slot's top edge at the top of the viewport.
    AtItem(ItemIndex),
}

impl ScrollPosition {
    /// Resolve to an absolute, clamped offset.
    ///
    /// `rect_of` supplies slot rectangles for `AtItem`.
    pub fn resolve<F>(&self, total_height: u64, viewport_height: u32, rect_of: F) -> LayoutOffset
    where
        F: Fn(ItemIndex) -> SlotRect,
    {
        let max = max_offset(total_height, viewport_height);
        let raw = match self {
            Self::Top => 0,
            Self::Bottom => max,
            Self::AtOffset(offset) => offset.get(),
            Self::AtItem(index) => rect_of(*index).top.get(),
        };
        LayoutOffset::new(raw.min(max))
    }
}

fn max_offset(total_height: u64, viewport_height: u32) -> u64 {
    total_height.saturating_sub(u64::from(viewport_height))
}

/// Current offset and viewport extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    offset: LayoutOffset,
    viewport: ViewportDimensions,
}

impl ScrollState {
    /// State at the top of a viewport of the given extent.
    pub fn new(viewport: ViewportDimensions) -> Self {
        Self {
            offset: LayoutOffset::default(),
            viewport,
        }
    }

    /// Current offset.
    pub fn offset(&self) -> LayoutOffset {
        self.offset
    }

    /// Current viewport.
    pub fn viewport(&self) -> ViewportDimensions {
        self.viewport
    }

    /// Largest valid offset for content of `total_height`.
    pub fn max_offset(&self, total_height: u64) -> u64 {
        max_offset(total_height, self.viewport.height)
    }

    /// Move by `delta`, clamped. Returns the distance actually moved.
    pub fn scroll_by(&mut self, delta: i64, total_height: u64) -> i64 {
        let before = self.offset.get();
        self.offset = self.offset.offset_by(delta, self.max_offset(total_height));
        self.offset.get() as i64 - before as i64
    }

    /// Jump to `position`. Returns the distance moved.
    pub fn scroll_to<F>(&mut self, position: ScrollPosition, total_height: u64, rect_of: F) -> i64
    where
        F: Fn(ItemIndex) -> SlotRect,
    {
        let before = self.offset.get();
        self.offset = position.resolve(total_height, self.viewport.height, rect_of);
        self.offset.get() as i64 - before as i64
    }

    /// Change the viewport, re-clamping the offset. Returns whether anything changed.
    pub fn resize(&mut self, viewport: ViewportDimensions, total_height: u64) -> bool {
        let before = *self;
        self.viewport = viewport;
        self.clamp(total_height);
        before != *self
    }

    /// Pull the offset back inside the content after it shrank.
    pub fn clamp(&mut self, total_height: u64) {
        let max = self.max_offset(total_height);
        if self.offset.get() > max {
            self.offset = LayoutOffset::new(max);
        }
    }

    /// Scroll the minimum distance that brings `rect` fully into view.
    ///
    /// Returns the distance moved (0 if already visible).
    pub fn reveal(&mut self, rect: SlotRect, total_height: u64) -> i64 {
        let top = self.offset.get();
        let bottom = top + u64::from(self.viewport.height);
        let target = if rect.top.get() < top {
            rect.top.get()
        } else if rect.bottom().get() > bottom {
            rect.bottom().get().saturating_sub(u64::from(self.viewport.height))
        } else {
            return 0;
        };
        let target = target.min(self.max_offset(total_height));
        self.offset = LayoutOffset::new(target);
        target as i64 - top as i64
    }
}
