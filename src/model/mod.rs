//! Domain model types (pure).
//!
//! All types in this module are plain data; the list engine consumes them
//! but never mutates them in place.

pub mod error;
pub mod identifiers;
pub mod summary;

// Re-export for convenience
pub use error::{AppError, InputError, ParseError};
pub use identifiers::ConversationId;
pub use summary::{ConversationSummary, SummaryPatch};
