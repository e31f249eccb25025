//! Scrollbar for the boot log.
//!
//! Computes a fixed thumb length once so the thumb does not change size as
//! the log scrolls, and pins it to the bottom while following new lines.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

const THUMB_SYMBOL: &str = "█";
const TRACK_SYMBOL: &str = "│";

#[derive(Debug, Clone)]
pub struct Scrollbar {
    total_lines: usize,
    viewport_height: usize,
    scroll_offset: usize,
    style: Style,
}

impl Scrollbar {
    pub fn new(total_lines: usize, viewport_height: usize, scroll_offset: usize) -> Self {
        Self {
            total_lines,
            viewport_height,
            scroll_offset,
            style: Style::default(),
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn should_display(&self) -> bool {
        self.total_lines > self.viewport_height
    }

    /// Returns `(thumb_start, thumb_len)` for a track of `track_len` rows.
    fn thumb(&self, track_len: usize) -> Option<(usize, usize)> {
        let max_scroll = self.total_lines.saturating_sub(self.viewport_height);
        if track_len == 0 || max_scroll == 0 {
            return None;
        }

        let viewport_len = self.viewport_height.min(track_len);
        let denom = (self.total_lines - 1 + viewport_len) as u64;
        let thumb_len = ((track_len as u64 * viewport_len as u64 + denom / 2) / denom) as usize;
        let thumb_len = thumb_len.clamp(1, track_len);

        let available = (track_len - thumb_len) as u64;
        let offset = self.scroll_offset.min(max_scroll) as u64;
        let thumb_start = (offset * available / max_scroll as u64) as usize;
        Some((thumb_start, thumb_len))
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.should_display() {
            return;
        }
        let Some((start, len)) = self.thumb(area.height as usize) else {
            return;
        };

        let x = area.right().saturating_sub(1);
        for (idx, y) in (area.top()..area.bottom()).enumerate() {
            let symbol = if (start..start + len).contains(&idx) {
                THUMB_SYMBOL
            } else {
                TRACK_SYMBOL
            };
            buf.set_string(x, y, symbol, self.style);
        }
    }
}
