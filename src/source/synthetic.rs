//! Deterministic demo data.
//!
//! Roughly three fifths personal contacts and two fifths groups, with
//! message times spread over the last 30 days. Groups are more likely to be
//! muted and to carry large unread counts.

use crate::model::{ConversationId, ConversationSummary, SummaryPatch};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};

/// Avatar handles cycled through by generated conversations.
pub const AVATAR_REFS: [&str; 6] = [
    "avatar1", "avatar2", "avatar3", "avatar4", "avatar5", "avatar6",
];

const FIRST_NAMES: [&str; 16] = [
    "Ada", "Bruno", "Chen", "Dara", "Elif", "Femi", "Greta", "Hiro", "Ines", "Jonas", "Kaia",
    "Luca", "Mina", "Nils", "Omar", "Priya",
];

const SURNAMES: [&str; 16] = [
    "Alves", "Berg", "Costa", "Dahl", "Eze", "Fischer", "Garcia", "Huang", "Ivanova", "Jensen",
    "Kowalski", "Lindqvist", "Moreau", "Novak", "Okafor", "Park",
];

const GROUP_KINDS: [&str; 8] = [
    "Book Club", "Study Group", "Fan Club", "Family", "Alumni", "Team", "Project", "Gaming",
];

const MESSAGES: [&str; 20] = [
    "Have you eaten yet?",
    "Are you there? Need a hand",
    "[Image]",
    "[Voice message]",
    "Meeting tomorrow at 3pm",
    "When will this feature land?",
    "On my way",
    "Let's go out this weekend",
    "Check this link: https://example.com",
    "😂😂😂",
    "Sure, no problem",
    "Let me think about it",
    "Thanks!",
    "Did you hear the news?",
    "New release is out",
    "Grab me a coffee please",
    "What's for dinner?",
    "How is the project going?",
    "Any idea how to fix this bug?",
    "Remember to bring your ID",
];

const WINDOW_MINUTES: i64 = 30 * 24 * 60;

/// Seeded generator of conversations and incoming messages.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    rng: StdRng,
    contacts: Vec<String>,
}

impl SyntheticSource {
    /// Generator seeded with `seed`; equal seeds produce equal data.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let contacts = (0..FIRST_NAMES.len() * 2)
            .map(|_| person_name(&mut rng))
            .collect();
        Self { rng, contacts }
    }

    /// `count` conversations with ids `1..=count`, in shuffled order.
    pub fn conversations(&mut self, count: usize, now: DateTime<Utc>) -> Vec<ConversationSummary> {
        let personal = count * 3 / 5;
        let mut items: Vec<ConversationSummary> = (0..count)
            .map(|i| self.conversation(i, i >= personal, now))
            .collect();
        items.shuffle(&mut self.rng);
        items
    }

    fn conversation(&mut self, i: usize, group: bool, now: DateTime<Utc>) -> ConversationSummary {
        let rng = &mut self.rng;
        let name = if group {
            let kind = GROUP_KINDS.choose(rng).copied().unwrap_or("Group");
            format!("{}'s {kind}", person_name(rng))
        } else {
            person_name(rng)
        };

        let minutes_ago = rng.random_range(0..WINDOW_MINUTES);
        let message = MESSAGES.choose(rng).copied().unwrap_or_default();
        let preview = match self.contacts.choose(rng) {
            Some(sender) if !group && rng.random_bool(0.5) => format!("{sender}: {message}"),
            _ => message.to_string(),
        };

        let unread = if rng.random_bool(if group { 0.6 } else { 0.3 }) {
            rng.random_range(1..if group { 150 } else { 20 })
        } else {
            0
        };
        let muted = rng.random_bool(if group { 0.3 } else { 0.1 });

        ConversationSummary::new(i as u64 + 1, name, now - Duration::minutes(minutes_ago))
            .with_avatar(AVATAR_REFS[i % AVATAR_REFS.len()])
            .with_preview(preview)
            .with_unread(unread)
            .with_muted(muted)
    }

    /// A new message for one of `ids`, arriving at `now`.
    ///
    /// `current_unread` looks up the conversation's unread count so the new
    /// message adds to it. Returns `None` when `ids` is empty.
    pub fn incoming_message(
        &mut self,
        ids: &[ConversationId],
        now: DateTime<Utc>,
        current_unread: impl Fn(ConversationId) -> u32,
    ) -> Option<(ConversationId, SummaryPatch)> {
        let id = *ids.choose(&mut self.rng)?;
        let message = MESSAGES.choose(&mut self.rng).copied().unwrap_or_default();
        let unread = current_unread(id).saturating_add(1);
        Some((id, SummaryPatch::new_message(message, now, unread)))
    }
}

fn person_name(rng: &mut StdRng) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Sam");
    let last = SURNAMES.choose(rng).copied().unwrap_or("Doe");
    format!("{first} {last}")
}
