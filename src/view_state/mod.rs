//! View-state layer - windowing, materialization and scroll scheduling
//!
//! Decides which conversations get a visual representation and how complete
//! it is, so a list of tens of thousands of rows only ever pays for the rows
//! near the viewport.
//!
//! # Module Structure
//!
//! - `types`: Core newtypes (ItemIndex, LayoutOffset, ViewportDimensions)
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `ordered_index`: OrderedIndex - summaries sorted newest first
//! - `layout`: SlotLayout - uniform or measured slot geometry
//! - `window`: WindowCalculator - visible range plus pre-fetch margin
//! - `budget`: RenderBudget - promotions allowed per pass
//! - `content`: ContentResolver - what a fully loaded row displays
//! - `materialization`: MaterializationController - stub/load/evict lifecycle
//! - `debouncer`: ScrollDebouncer - coalesces events into passes
//! - `scroll`: ScrollState / ScrollPosition - clamped viewport offset
//! - `list`: ConversationList - the engine facade

pub mod budget;
pub mod content;
pub mod debouncer;
pub mod height_index;
pub mod layout;
pub mod list;
pub mod materialization;
pub mod ordered_index;
pub mod scroll;
pub mod types;
pub mod window;

pub use list::{ConversationList, EngineConfig, Renderer};
pub use materialization::{PassReport, RepresentationState, VisualRepresentation};
pub use types::{ItemIndex, LayoutOffset, ViewportDimensions};
