//! Row styling.

use crate::view_state::content::{AvatarImage, AvatarSlot, Badge};
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether to emit colors.
///
/// Disabled by `--no-color` or by a `NO_COLOR` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from the CLI flag and environment.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Explicit setting, ignoring the environment.
    pub fn with_colors(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== RowStyles =====

/// Styles for list rows and the status bar.
#[derive(Debug, Clone, Copy)]
pub struct RowStyles {
    colors: bool,
    name: Style,
    preview: Style,
    time: Style,
    unread: Style,
    muted: Style,
    stub: Style,
    selected: Style,
    status: Style,
}

impl RowStyles {
    /// Styles for the given color setting.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let selected = Style::default().add_modifier(Modifier::REVERSED);
        if config.colors_enabled() {
            Self {
                colors: true,
                name: Style::default().add_modifier(Modifier::BOLD),
                preview: Style::default().fg(Color::Gray),
                time: Style::default().fg(Color::DarkGray),
                unread: Style::default().fg(Color::White).bg(Color::Red),
                muted: Style::default().fg(Color::DarkGray),
                stub: Style::default().fg(Color::DarkGray),
                selected,
                status: Style::default().fg(Color::Black).bg(Color::Cyan),
            }
        } else {
            Self {
                colors: false,
                name: Style::default().add_modifier(Modifier::BOLD),
                preview: Style::default(),
                time: Style::default(),
                unread: Style::default(),
                muted: Style::default(),
                stub: Style::default().add_modifier(Modifier::DIM),
                selected,
                status: Style::default().add_modifier(Modifier::REVERSED),
            }
        }
    }

    /// Display name.
    pub fn name(&self) -> Style {
        self.name
    }

    /// Message preview.
    pub fn preview(&self) -> Style {
        self.preview
    }

    /// Time label.
    pub fn time(&self) -> Style {
        self.time
    }

    /// Placeholder rows.
    pub fn stub(&self) -> Style {
        self.stub
    }

    /// Overlay for the selected row.
    pub fn selected(&self) -> Style {
        self.selected
    }

    /// Status bar.
    pub fn status(&self) -> Style {
        self.status
    }

    /// Style for a badge.
    pub fn badge(&self, badge: &Badge) -> Style {
        match badge {
            Badge::Muted => self.muted,
            Badge::Unread(_) => self.unread,
            Badge::None => Style::default(),
        }
    }

    /// Style for the avatar glyph: the image's centre colour when colors are on.
    pub fn avatar(&self, avatar: &AvatarSlot) -> Style {
        match avatar.image().and_then(AvatarImage::center_color) {
            Some([r, g, b, _]) if self.colors => Style::default().fg(Color::Rgb(r, g, b)),
            _ => Style::default(),
        }
    }
}

impl Default for RowStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

/// Glyph for an avatar slot.
pub fn avatar_glyph(avatar: &AvatarSlot) -> &'static str {
    match avatar {
        AvatarSlot::Pending => "◌",
        AvatarSlot::Ready(_) | AvatarSlot::Fallback(_) => "●",
    }
}

/// Text for a badge; empty when there is nothing to show.
pub fn badge_text(badge: &Badge) -> String {
    match badge {
        Badge::None => String::new(),
        Badge::Unread(count) => format!(" {count} "),
        Badge::Muted => "muted".to_string(),
    }
}
