//! Content of a fully loaded row: avatar, elided text, time label, badge.
//!
//! Also defines the collaborator seams the engine resolves content through:
//! [`AvatarResolver`] for images and [`Clock`] for the wall-clock "now".

use crate::model::ConversationSummary;
use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, Utc};
use std::sync::Arc;
use unicode_width::UnicodeWidthChar;

/// Diameter avatars are produced at.
pub const AVATAR_DIAMETER: u32 = 40;

/// Unread counts above this collapse to `99+`.
pub const MAX_UNREAD_SHOWN: u32 = 99;

const ELLIPSIS: char = '…';

/// Decoded avatar bitmap (RGBA, `diameter × diameter`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarImage {
    /// Edge length in pixels.
    pub diameter: u32,
    /// Row-major RGBA bytes.
    pub rgba: Arc<[u8]>,
}

impl AvatarImage {
    /// Image filled with a single colour.
    pub fn solid(diameter: u32, rgba: [u8; 4]) -> Self {
        let pixels = (diameter * diameter) as usize;
        let bytes: Vec<u8> = rgba.iter().copied().cycle().take(pixels * 4).collect();
        Self {
            diameter,
            rgba: bytes.into(),
        }
    }

    /// Flat light-grey disc used when neither the avatar nor a default exists.
    pub fn placeholder() -> Self {
        Self::solid(AVATAR_DIAMETER, [0xD3, 0xD3, 0xD3, 0xFF])
    }

    /// Colour of the centre pixel, if the image has any pixels.
    pub fn center_color(&self) -> Option<[u8; 4]> {
        let mid = (self.diameter / 2) as usize;
        let at = (mid * self.diameter as usize + mid) * 4;
        self.rgba
            .get(at..at + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Answer from an [`AvatarResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarLookup {
    /// Image is available now.
    Ready(AvatarImage),
    /// Image is being fetched; it will arrive through
    /// [`ConversationList::deliver_avatar`](super::list::ConversationList::deliver_avatar).
    Pending,
    /// No image exists for this handle.
    Missing,
}

/// Image source for avatar handles.
pub trait AvatarResolver {
    /// Look up the image for `avatar_ref`.
    fn resolve(&mut self, avatar_ref: &str) -> AvatarLookup;

    /// Default avatar used for missing images.
    fn fallback(&mut self) -> Option<AvatarImage> {
        None
    }
}

/// Resolver for lists that have no images; every row gets the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAvatars;

impl AvatarResolver for NoAvatars {
    fn resolve(&mut self, _avatar_ref: &str) -> AvatarLookup {
        AvatarLookup::Missing
    }
}

/// Wall clock used for time labels.
pub trait Clock {
    /// Current time in the zone labels should be shown in.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The system clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Avatar state inside a loaded row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSlot {
    /// Waiting for the resolver to deliver.
    Pending,
    /// The conversation's own image.
    Ready(AvatarImage),
    /// Default image standing in for a missing one.
    Fallback(AvatarImage),
}

impl AvatarSlot {
    /// Image to draw, if any.
    pub fn image(&self) -> Option<&AvatarImage> {
        match self {
            Self::Pending => None,
            Self::Ready(image) | Self::Fallback(image) => Some(image),
        }
    }
}

/// Notification marker on the right of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    /// Nothing to show.
    None,
    /// Unread counter text (`1`..`99`, or `99+`).
    Unread(String),
    /// Do-not-disturb marker; hides the counter.
    Muted,
}

impl Badge {
    /// Badge for a summary.
    pub fn for_summary(summary: &ConversationSummary) -> Self {
        if summary.muted {
            Self::Muted
        } else if summary.unread_count == 0 {
            Self::None
        } else if summary.unread_count > MAX_UNREAD_SHOWN {
            Self::Unread(format!("{MAX_UNREAD_SHOWN}+"))
        } else {
            Self::Unread(summary.unread_count.to_string())
        }
    }
}

/// Display widths used when eliding text, in terminal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentOptions {
    /// Width available to the display name.
    pub name_width: usize,
    /// Width available to the message preview.
    pub preview_width: usize,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            name_width: 18,
            preview_width: 28,
        }
    }
}

/// Everything a fully loaded row displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    /// Avatar image state.
    pub avatar: AvatarSlot,
    /// Elided display name.
    pub title: String,
    /// Elided message preview.
    pub preview: String,
    /// Relative time label.
    pub time_label: String,
    /// Notification marker.
    pub badge: Badge,
}

/// Resolves summaries into [`ResolvedContent`] through the injected collaborators.
pub struct ContentResolver {
    options: ContentOptions,
    avatars: Box<dyn AvatarResolver>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for ContentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentResolver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ContentResolver {
    /// Create a resolver.
    pub fn new(
        options: ContentOptions,
        avatars: Box<dyn AvatarResolver>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            options,
            avatars,
            clock,
        }
    }

    /// Elision widths in use.
    pub fn options(&self) -> ContentOptions {
        self.options
    }

    /// Resolve every display field of `summary`.
    pub fn resolve(&mut self, summary: &ConversationSummary) -> ResolvedContent {
        let avatar = self.avatar_for(&summary.avatar_ref);
        ResolvedContent {
            avatar,
            title: elide(&summary.display_name, self.options.name_width),
            preview: elide(&summary.last_message_preview, self.options.preview_width),
            time_label: format_time(summary.last_message_time, self.clock.now()),
            badge: Badge::for_summary(summary),
        }
    }

    fn avatar_for(&mut self, avatar_ref: &str) -> AvatarSlot {
        let lookup = if avatar_ref.is_empty() {
            AvatarLookup::Missing
        } else {
            self.avatars.resolve(avatar_ref)
        };
        match lookup {
            AvatarLookup::Ready(image) => AvatarSlot::Ready(image),
            AvatarLookup::Pending => AvatarSlot::Pending,
            AvatarLookup::Missing => AvatarSlot::Fallback(
                self.avatars
                    .fallback()
                    .unwrap_or_else(AvatarImage::placeholder),
            ),
        }
    }
}

/// Label for a message time relative to `now`, in `now`'s timezone.
///
/// - same day: `HH:MM`
/// - previous day: `Yesterday`
/// - up to 7 days back: weekday (`Mon`..`Sun`)
/// - same year: `MM-DD`
/// - otherwise: `YYYY-MM-DD`
pub fn format_time(time: DateTime<Utc>, now: DateTime<FixedOffset>) -> String {
    let local = time.with_timezone(&now.timezone());
    let today = now.date_naive();
    let date = local.date_naive();

    if date == today {
        local.format("%H:%M").to_string()
    } else if date < today && date + Duration::days(1) == today {
        "Yesterday".to_string()
    } else if date < today && date + Duration::days(7) >= today {
        local.format("%a").to_string()
    } else if date.year() == today.year() {
        local.format("%m-%d").to_string()
    } else {
        local.format("%Y-%m-%d").to_string()
    }
}

/// Shorten `text` to at most `width` display columns, ending in `…` when cut.
///
/// Line breaks are flattened to spaces first.
pub fn elide(text: &str, width: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    let total: usize = flat.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return flat;
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in flat.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    out
}
