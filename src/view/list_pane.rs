//! Conversation list pane.
//!
//! Maps engine slots onto terminal rows at [`UNITS_PER_ROW`] layout units per
//! row. Each row of a 72-unit slot shows:
//!
//! ```text
//! ● Display Name        12:30
//!   Last message preview   3
//! ```
//!
//! Stubs paint a placeholder bar; absent slots paint nothing.

use super::constants::{AVATAR_COLUMNS, UNITS_PER_ROW};
use super::styles::{avatar_glyph, badge_text, RowStyles};
use crate::model::ConversationSummary;
use crate::view_state::content::ResolvedContent;
use crate::view_state::{ConversationList, ItemIndex, LayoutOffset, Renderer, VisualRepresentation};
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use unicode_width::UnicodeWidthStr;

const STUB_GLYPH: &str = "░";

/// Paints materialized rows straight into a frame buffer.
pub struct RowPainter<'a> {
    buffer: &'a mut Buffer,
    area: Rect,
    list: &'a ConversationList,
    styles: &'a RowStyles,
}

impl<'a> RowPainter<'a> {
    /// Painter for `list` into `area` of `buffer`.
    pub fn new(
        buffer: &'a mut Buffer,
        area: Rect,
        list: &'a ConversationList,
        styles: &'a RowStyles,
    ) -> Self {
        Self {
            buffer,
            area,
            list,
            styles,
        }
    }

    /// First terminal line of a slot relative to the pane, possibly negative.
    fn first_line(&self, index: ItemIndex) -> i64 {
        let top = self.list.item_rect(index).top.get() as i64;
        let offset = self.list.scroll_offset().get() as i64;
        (top - offset).div_euclid(UNITS_PER_ROW as i64)
    }

    fn line_count(&self, index: ItemIndex) -> i64 {
        (self.list.item_rect(index).height / UNITS_PER_ROW).max(1) as i64
    }

    fn title_line(&mut self, y: u16, representation: &VisualRepresentation) {
        let x = self.area.x;
        let right = self.area.right();
        let name_x = x.saturating_add(AVATAR_COLUMNS);

        let Some(content) = representation.content() else {
            self.buffer.set_string(x, y, STUB_GLYPH, self.styles.stub());
            if name_x < right {
                let bar = STUB_GLYPH.repeat(usize::from(right - name_x) / 2);
                self.buffer
                    .set_stringn(name_x, y, bar, usize::from(right - name_x), self.styles.stub());
            }
            return;
        };

        self.buffer.set_string(
            x,
            y,
            avatar_glyph(&content.avatar),
            self.styles.avatar(&content.avatar),
        );
        if name_x >= right {
            return;
        }
        let label_x = self.right_aligned(y, &content.time_label, self.styles.time());
        let name_width = usize::from(label_x.saturating_sub(name_x + 1).max(1));
        self.buffer
            .set_stringn(name_x, y, &content.title, name_width, self.styles.name());
    }

    fn detail_line(&mut self, y: u16, content: &ResolvedContent) {
        let name_x = self.area.x.saturating_add(AVATAR_COLUMNS);
        if name_x >= self.area.right() {
            return;
        }
        let badge = badge_text(&content.badge);
        let badge_x = self.right_aligned(y, &badge, self.styles.badge(&content.badge));
        let preview_width = usize::from(badge_x.saturating_sub(name_x + 1).max(1));
        self.buffer
            .set_stringn(name_x, y, &content.preview, preview_width, self.styles.preview());
    }

    /// Draw `text` flush right on line `y`; returns its start column.
    fn right_aligned(&mut self, y: u16, text: &str, style: ratatui::style::Style) -> u16 {
        let right = self.area.right();
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        let start = right.saturating_sub(width).max(self.area.x);
        if !text.is_empty() && start < right {
            self.buffer
                .set_stringn(start, y, text, usize::from(right - start), style);
        }
        start
    }
}

impl Renderer for RowPainter<'_> {
    fn paint(
        &mut self,
        index: ItemIndex,
        _summary: &ConversationSummary,
        representation: &VisualRepresentation,
    ) {
        let first = self.first_line(index);
        for line in 0..self.line_count(index) {
            let relative = first + line;
            if relative < 0 || relative >= i64::from(self.area.height) {
                continue;
            }
            let y = self.area.y + relative as u16;
            match (line, representation.content()) {
                (0, _) => self.title_line(y, representation),
                (1, Some(content)) => self.detail_line(y, content),
                _ => {}
            }
            if representation.is_selected() {
                let row = Rect::new(self.area.x, y, self.area.width, 1);
                self.buffer.set_style(row, self.styles.selected());
            }
        }
    }
}

/// Paint every materialized row of `list` into `area`.
pub fn render_list(list: &ConversationList, area: Rect, buffer: &mut Buffer, styles: &RowStyles) {
    if area.is_empty() {
        return;
    }
    let mut painter = RowPainter::new(buffer, area, list, styles);
    list.paint(&mut painter);
}

/// Slot under terminal cell (`column`, `row`), if the cell is inside `area`
/// and over content.
pub fn slot_at_cell(
    list: &ConversationList,
    area: Rect,
    column: u16,
    row: u16,
) -> Option<ItemIndex> {
    if !area.contains(Position::new(column, row)) {
        return None;
    }
    let units = list.scroll_offset().get() + u64::from(row - area.y) * UNITS_PER_ROW;
    if units >= list.total_height() {
        return None;
    }
    list.slot_at(LayoutOffset::new(units))
}

/// One-line engine summary for the status bar.
pub fn format_status(list: &ConversationList, source: &str) -> String {
    let selection = list
        .current_selection()
        .map_or_else(|| "-".to_string(), |at| format!("#{}", at.get() + 1));
    let state = if list.is_fast_scrolling() {
        "fast"
    } else if list.is_pass_pending() {
        "pending"
    } else {
        "idle"
    };
    format!(
        " {source} | {count} chats | sel {selection} | loaded {loaded}/{materialized} | {state}",
        count = list.count(),
        loaded = list.loaded_set().len(),
        materialized = list.materialized_count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::styles::ColorConfig;
    use crate::view_state::content::{FixedClock, NoAvatars};
    use crate::view_state::{EngineConfig, ViewportDimensions};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::time::Instant;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn buffer_to_string(buffer: &Buffer) -> String {
        let area = buffer.area();
        let mut lines = Vec::new();

        for y in area.top()..area.bottom() {
            let mut line = String::new();
            for x in area.left()..area.right() {
                line.push_str(buffer[(x, y)].symbol());
            }
            let trimmed = line.trim_end();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }

        lines.join("\n")
    }

    fn two_chats(rows: u16) -> ConversationList {
        let mut list = ConversationList::new(
            EngineConfig::default(),
            ViewportDimensions::new(24, u32::from(rows) * UNITS_PER_ROW as u32),
            Box::new(NoAvatars),
            Box::new(FixedClock(base().fixed_offset())),
        );
        list.ingest(
            [
                ConversationSummary::new(1, "Ada", base() - Duration::minutes(1))
                    .with_preview("Hi there")
                    .with_unread(3),
                ConversationSummary::new(2, "Bruno", base() - Duration::minutes(2))
                    .with_preview("Bye")
                    .with_muted(true),
            ],
            Instant::now(),
        );
        list
    }

    fn styles() -> RowStyles {
        RowStyles::with_color_config(ColorConfig::with_colors(false))
    }

    #[test]
    fn renders_loaded_rows() {
        let list = two_chats(4);
        let area = Rect::new(0, 0, 24, 4);
        let mut buffer = Buffer::empty(area);

        render_list(&list, area, &mut buffer, &styles());

        insta::assert_snapshot!(buffer_to_string(&buffer), @r"
        ● Ada              11:59
          Hi there            3
        ● Bruno            11:58
          Bye              muted
        ");
    }

    #[test]
    fn scrolled_rows_are_offset() {
        let mut list = two_chats(2);
        list.scroll_by(72, Instant::now());
        let area = Rect::new(0, 0, 24, 2);
        let mut buffer = Buffer::empty(area);

        render_list(&list, area, &mut buffer, &styles());

        assert!(buffer_to_string(&buffer).starts_with("● Bruno"));
    }

    #[test]
    fn long_names_are_clipped_before_time() {
        let mut list = two_chats(2);
        list.apply_upsert(
            crate::model::ConversationId::new(1),
            crate::model::SummaryPatch {
                display_name: Some("Bartholomew Fitzgerald".into()),
                ..Default::default()
            },
            Instant::now(),
        );
        let area = Rect::new(0, 0, 24, 2);
        let mut buffer = Buffer::empty(area);

        render_list(&list, area, &mut buffer, &styles());

        let first = buffer_to_string(&buffer);
        let first = first.lines().next().unwrap();
        assert!(first.ends_with("11:59"));
        assert!(first.contains("Bartholomew"));
    }

    #[test]
    fn selected_row_is_reversed() {
        let mut list = two_chats(4);
        list.select_index(ItemIndex::new(1));
        let area = Rect::new(0, 0, 24, 4);
        let mut buffer = Buffer::empty(area);

        render_list(&list, area, &mut buffer, &styles());

        let reversed = ratatui::style::Modifier::REVERSED;
        assert!(buffer[(0, 2)].modifier.contains(reversed));
        assert!(buffer[(23, 3)].modifier.contains(reversed));
        assert!(!buffer[(0, 0)].modifier.contains(reversed));
    }

    #[test]
    fn hit_test_maps_cells_to_slots() {
        let list = two_chats(6);
        let area = Rect::new(0, 1, 24, 6);

        assert_eq!(slot_at_cell(&list, area, 3, 1), Some(ItemIndex::new(0)));
        assert_eq!(slot_at_cell(&list, area, 3, 2), Some(ItemIndex::new(0)));
        assert_eq!(slot_at_cell(&list, area, 3, 3), Some(ItemIndex::new(1)));
        assert_eq!(slot_at_cell(&list, area, 3, 5), None, "below content");
        assert_eq!(slot_at_cell(&list, area, 3, 0), None, "outside pane");
    }

    #[test]
    fn status_reports_engine_state() {
        let list = two_chats(4);

        insta::assert_snapshot!(
            format_status(&list, "demo"),
            @" demo | 2 chats | sel - | loaded 2/2 | pending"
        );
    }
}
