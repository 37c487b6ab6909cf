//! Layout dimension constants for TUI rendering.

/// Layout units per terminal row.
///
/// The engine works in abstract layout units; the terminal maps them onto
/// rows at this scale, so a 72-unit item occupies two rows.
pub const UNITS_PER_ROW: u64 = 36;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Rows moved per mouse wheel notch.
pub const WHEEL_ROWS: i64 = 3;

/// Columns taken by the avatar glyph and its gap.
pub const AVATAR_COLUMNS: u16 = 2;

/// Poll timeout while no pass is pending.
pub const IDLE_POLL_MS: u64 = 500;
