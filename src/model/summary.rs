//! Conversation summary record and partial-update payload.

use super::ConversationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the conversation list.
///
/// Supplied by the data collaborator; the list engine never edits a summary,
/// it only replaces it wholesale on upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// Stable identity.
    pub id: ConversationId,
    /// Contact or group name.
    pub display_name: String,
    /// Opaque handle passed to the avatar resolver.
    #[serde(default)]
    pub avatar_ref: String,
    /// Preview of the most recent message.
    #[serde(default)]
    pub last_message_preview: String,
    /// Time of the most recent message. Sort key, newest first.
    pub last_message_time: DateTime<Utc>,
    /// Number of unread messages.
    #[serde(default)]
    pub unread_count: u32,
    /// Do-not-disturb flag.
    #[serde(default)]
    pub muted: bool,
    /// Records with `valid == false` are dropped at ingestion.
    #[serde(default = "default_valid")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

impl ConversationSummary {
    /// Create a valid summary with empty preview, no avatar, nothing unread.
    pub fn new(
        id: impl Into<ConversationId>,
        display_name: impl Into<String>,
        last_message_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_ref: String::new(),
            last_message_preview: String::new(),
            last_message_time,
            unread_count: 0,
            muted: false,
            valid: true,
        }
    }

    /// Builder: set the message preview.
    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.last_message_preview = preview.into();
        self
    }

    /// Builder: set the avatar handle.
    pub fn with_avatar(mut self, avatar_ref: impl Into<String>) -> Self {
        self.avatar_ref = avatar_ref.into();
        self
    }

    /// Builder: set the unread counter.
    pub fn with_unread(mut self, unread_count: u32) -> Self {
        self.unread_count = unread_count;
        self
    }

    /// Builder: set the muted flag.
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Builder: set the validity flag.
    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    /// Whether this record may be placed in the list.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl Default for ConversationSummary {
    /// Placeholder returned for out-of-range lookups.
    fn default() -> Self {
        Self {
            id: ConversationId::new(0),
            display_name: String::new(),
            avatar_ref: String::new(),
            last_message_preview: String::new(),
            last_message_time: DateTime::<Utc>::UNIX_EPOCH,
            unread_count: 0,
            muted: false,
            valid: false,
        }
    }
}

/// Partial or full replacement for a summary, keyed externally by id.
///
/// Fields left as `None` keep the existing value when applied to a known
/// conversation. For an unknown id the patch must carry at least a display
/// name and a message time to become a new summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryPatch {
    /// New display name.
    pub display_name: Option<String>,
    /// New avatar handle.
    pub avatar_ref: Option<String>,
    /// New message preview.
    pub last_message_preview: Option<String>,
    /// New message time.
    pub last_message_time: Option<DateTime<Utc>>,
    /// New unread count.
    pub unread_count: Option<u32>,
    /// New muted flag.
    pub muted: Option<bool>,
    /// New validity flag.
    pub valid: Option<bool>,
}

impl SummaryPatch {
    /// Patch carrying every field of `summary`.
    pub fn full(summary: &ConversationSummary) -> Self {
        Self {
            display_name: Some(summary.display_name.clone()),
            avatar_ref: Some(summary.avatar_ref.clone()),
            last_message_preview: Some(summary.last_message_preview.clone()),
            last_message_time: Some(summary.last_message_time),
            unread_count: Some(summary.unread_count),
            muted: Some(summary.muted),
            valid: Some(summary.valid),
        }
    }

    /// A new message arrived: bump recency, replace the preview and count it as unread.
    pub fn new_message(preview: impl Into<String>, at: DateTime<Utc>, unread_count: u32) -> Self {
        Self {
            last_message_preview: Some(preview.into()),
            last_message_time: Some(at),
            unread_count: Some(unread_count),
            ..Self::default()
        }
    }

    /// Overlay this patch on an existing summary.
    pub fn apply_to(&self, base: &ConversationSummary) -> ConversationSummary {
        ConversationSummary {
            id: base.id,
            display_name: self
                .display_name
                .clone()
                .unwrap_or_else(|| base.display_name.clone()),
            avatar_ref: self
                .avatar_ref
                .clone()
                .unwrap_or_else(|| base.avatar_ref.clone()),
            last_message_preview: self
                .last_message_preview
                .clone()
                .unwrap_or_else(|| base.last_message_preview.clone()),
            last_message_time: self.last_message_time.unwrap_or(base.last_message_time),
            unread_count: self.unread_count.unwrap_or(base.unread_count),
            muted: self.muted.unwrap_or(base.muted),
            valid: self.valid.unwrap_or(base.valid),
        }
    }

    /// Build a fresh summary for `id`, if the patch is complete enough.
    ///
    /// Returns `None` when the display name or message time is missing.
    pub fn into_summary(self, id: ConversationId) -> Option<ConversationSummary> {
        let display_name = self.display_name?;
        let last_message_time = self.last_message_time?;
        Some(ConversationSummary {
            id,
            display_name,
            avatar_ref: self.avatar_ref.unwrap_or_default(),
            last_message_preview: self.last_message_preview.unwrap_or_default(),
            last_message_time,
            unread_count: self.unread_count.unwrap_or(0),
            muted: self.muted.unwrap_or(false),
            valid: self.valid.unwrap_or(true),
        })
    }
}
