//! Conversation identifier newtype.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, stable identifier of a conversation.
///
/// Identity survives reordering: the same id keeps naming the same
/// conversation while its position in the list changes with recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(u64);

impl ConversationId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ConversationId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
