//! Pure view functions for the boot screen.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.
//!
//! Layout:
//!
//! ```text
//! ╭─ PHOSPHOR-TERM 3000 ───────────────────╮
//! │ [12:00:01.250] BIOS v4.02 ...          │
//! │ [12:00:01.400] CPU: ...               ││
//! │ █                                     █│
//! │ ◐ BOOTING 3/18                 FOLLOW  │
//! ╰────────────────────────────────────────╯
//! ```
//!
//! CRT overlays are applied over the whole frame after everything else.

use bootseq_core::RevealedLine;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::common::Scrollbar;
use crate::common::text::{sanitize_for_display, truncate_with_ellipsis};
use crate::crt::CrtOverlay;
use crate::cursor::CURSOR_GLYPH;
use crate::state::AppState;
use crate::style;

const TITLE: &str = " PHOSPHOR-TERM 3000 ";

/// Rows used by the status line under the log.
const STATUS_HEIGHT: u16 = 1;

/// Columns reserved for the scrollbar on the right of the log.
const SCROLLBAR_WIDTH: u16 = 1;

/// Gap between the log text and the left border.
const LOG_MARGIN: u16 = 1;

/// Spinner frames for the BOOTING indicator.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Ticks per spinner frame.
const SPINNER_TICKS: u64 = 6;

const PROMPT: &str = "> ";

const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

/// Renders the whole screen.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();

    let screen = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(style::chrome_style())
        .style(style::screen_style())
        .title(Span::styled(TITLE, style::chrome_style()));
    let inner = screen.inner(area);
    frame.render_widget(screen, area);

    let [log_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(STATUS_HEIGHT)]).areas(inner);

    render_log(app, frame, log_area);
    render_status_line(app, frame, status_area);

    frame.render_widget(CrtOverlay::new(&app.options.effects, app.frame), area);
}

/// Height of the log viewport for a terminal of the given size.
///
/// The reducer uses this for page-sized scrolling.
pub fn log_viewport_height(height: u16) -> usize {
    // Two border rows plus the status line.
    height.saturating_sub(2 + STATUS_HEIGHT) as usize
}

fn render_log(app: &AppState, frame: &mut Frame, area: Rect) {
    let text_area = Rect {
        x: area.x + LOG_MARGIN,
        y: area.y,
        width: area.width.saturating_sub(LOG_MARGIN + SCROLLBAR_WIDTH),
        height: area.height,
    };
    let width = text_area.width as usize;
    let viewport = area.height as usize;

    let total = app.log_line_count();
    let offset = app.scroll.offset(total, viewport);

    let lines: Vec<Line<'static>> = app
        .reveal
        .revealed()
        .iter()
        .map(|revealed| revealed_line(revealed, app.options.show_timestamps, width))
        .chain(std::iter::once(cursor_line(app)))
        .skip(offset)
        .take(viewport)
        .collect();

    frame.render_widget(Paragraph::new(lines), text_area);
    frame.render_widget(
        Scrollbar::new(total, viewport, offset).style(style::chrome_style()),
        area,
    );
}

/// Builds the display line for one revealed script line.
pub fn revealed_line(
    revealed: &RevealedLine,
    show_timestamp: bool,
    width: usize,
) -> Line<'static> {
    let tag = revealed.line.style();
    let text = sanitize_for_display(revealed.line.text());
    let text_style = style::line_style(tag);

    if style::is_centered(tag) {
        let text = truncate_with_ellipsis(&text, width).into_owned();
        return Line::from(Span::styled(text, text_style)).alignment(Alignment::Center);
    }

    let mut spans = Vec::with_capacity(2);
    let mut remaining = width;
    if show_timestamp {
        let stamp = format!("[{}] ", revealed.timestamp.format(TIMESTAMP_FORMAT));
        remaining = remaining.saturating_sub(stamp.width());
        spans.push(Span::styled(stamp, style::timestamp_style()));
    }
    spans.push(Span::styled(
        truncate_with_ellipsis(&text, remaining).into_owned(),
        text_style,
    ));
    Line::from(spans)
}

/// The row after the last revealed line: a bare cursor while booting, a
/// prompt once ready. The cursor glyph blinks.
fn cursor_line(app: &AppState) -> Line<'static> {
    let cursor = if app.cursor.is_visible(app.now) {
        CURSOR_GLYPH
    } else {
        " "
    };

    let mut spans = Vec::with_capacity(2);
    if app.reveal.is_complete() {
        spans.push(Span::styled(PROMPT, style::ready_style()));
    }
    spans.push(Span::styled(cursor, style::cursor_style()));
    Line::from(spans)
}

fn render_status_line(app: &AppState, frame: &mut Frame, area: Rect) {
    let (revealed, total) = app.reveal.progress();
    let left = if app.reveal.is_complete() {
        Line::from(vec![
            Span::styled(" ● READY", style::ready_style()),
            Span::styled(format!("  {total} lines"), style::chrome_style()),
        ])
    } else {
        let spinner_index = (app.frame / SPINNER_TICKS) as usize % SPINNER_FRAMES.len();
        let spinner = SPINNER_FRAMES[spinner_index];
        Line::from(vec![
            Span::styled(format!(" {spinner} BOOTING"), style::booting_style()),
            Span::styled(format!("  {revealed}/{total}"), style::chrome_style()),
        ])
    };

    let mode = if app.scroll.is_following() {
        "FOLLOW"
    } else {
        "SCROLL"
    };
    let right = Line::from(Span::styled(
        format!("{mode} · q quit "),
        style::chrome_style(),
    ))
    .alignment(Alignment::Right);

    frame.render_widget(Paragraph::new(left), area);
    frame.render_widget(Paragraph::new(right), area);
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use bootseq_core::config::EffectsConfig;
    use bootseq_core::{Line as ScriptLine, StyleTag};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::state::{AppState, BootOptions};
    use crate::test_support::{buffer_lines, final_state, snapshots};

    fn options() -> BootOptions {
        BootOptions {
            show_timestamps: false,
            effects: EffectsConfig::disabled(),
            ..BootOptions::default()
        }
    }

    fn draw(app: &AppState, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    fn script() -> Vec<ScriptLine> {
        vec![
            ScriptLine::new("1", "Memory check").with_delay_ms(0),
            ScriptLine::new("2", "Disk OK")
                .with_style(StyleTag::Success)
                .with_delay_ms(0),
            ScriptLine::new("3", "ONLINE")
                .with_style(StyleTag::Hero)
                .with_delay_ms(0),
        ]
    }

    #[tokio::test]
    async fn test_renders_booting_while_revealing() {
        let states = snapshots(script()).await;
        let mut app = AppState::new(options(), 3, Instant::now());
        app.reveal = states[0].clone();

        let screen = draw(&app, 50, 10).join("\n");
        assert!(screen.contains("PHOSPHOR-TERM 3000"));
        assert!(screen.contains("Memory check"));
        assert!(!screen.contains("Disk OK"));
        assert!(screen.contains("BOOTING"));
        assert!(screen.contains("1/3"));
        assert!(!screen.contains("READY"));
    }

    #[tokio::test]
    async fn test_renders_ready_and_prompt_when_complete() {
        let mut app = AppState::new(options(), 3, Instant::now());
        app.reveal = final_state(script()).await;

        let screen = draw(&app, 50, 10);
        let joined = screen.join("\n");
        assert!(joined.contains("READY"));
        assert!(!joined.contains("BOOTING"));
        assert!(joined.contains("Disk OK"));
        assert!(screen.iter().any(|row| row.contains("> █")));
    }

    #[tokio::test]
    async fn test_hero_line_is_centered() {
        let mut app = AppState::new(options(), 3, Instant::now());
        app.reveal = final_state(script()).await;

        let screen = draw(&app, 50, 10);
        let row = screen.iter().find(|row| row.contains("ONLINE")).unwrap();
        let col = row.find("ONLINE").unwrap();
        assert!(col > 15, "hero banner should be centered, found at column {col}");
    }

    #[tokio::test]
    async fn test_timestamps_toggle() {
        let final_snapshot = final_state(script()).await;

        let mut app = AppState::new(options(), 3, Instant::now());
        app.reveal = final_snapshot.clone();
        let plain = draw(&app, 60, 10).join("\n");
        assert!(!plain.contains("] Memory check"));

        let mut app = AppState::new(
            BootOptions {
                show_timestamps: true,
                ..options()
            },
            3,
            Instant::now(),
        );
        app.reveal = final_snapshot;
        let stamped = draw(&app, 60, 10).join("\n");
        assert!(stamped.contains("] Memory check"));
    }

    #[tokio::test]
    async fn test_follow_mode_shows_newest_lines() {
        let lines: Vec<ScriptLine> = (0..30)
            .map(|i| {
                ScriptLine::new(format!("l{i}"), format!("line number {i:02}")).with_delay_ms(0)
            })
            .collect();
        let mut app = AppState::new(options(), 30, Instant::now());
        app.reveal = final_state(lines).await;

        let screen = draw(&app, 40, 10).join("\n");
        assert!(screen.contains("line number 29"));
        assert!(!screen.contains("line number 00"));

        app.scroll.to_top();
        let screen = draw(&app, 40, 10).join("\n");
        assert!(screen.contains("line number 00"));
        assert!(screen.contains("SCROLL"));
    }

    #[tokio::test]
    async fn test_cursor_blinks_off() {
        let start = Instant::now();
        let mut app = AppState::new(
            BootOptions {
                cursor_blink: Duration::from_millis(500),
                ..options()
            },
            3,
            start,
        );
        app.reveal = final_state(script()).await;

        app.now = start + Duration::from_millis(600);
        let screen = draw(&app, 50, 10);
        assert!(screen.iter().any(|row| row.contains("> ")));
        assert!(!screen.iter().any(|row| row.contains("> █")));
    }

    #[test]
    fn test_log_viewport_height() {
        assert_eq!(log_viewport_height(10), 7);
        assert_eq!(log_viewport_height(2), 0);
    }
}
