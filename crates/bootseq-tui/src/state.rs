//! Application state for the boot screen.
//!
//! ```text
//! AppState
//! ├── options: BootOptions     (from config + CLI flags, read-only)
//! ├── reveal: RevealState      (latest engine snapshot)
//! ├── reveal_task: TaskState   (cancellation handle of the running reveal)
//! ├── scroll: ScrollState      (follow / scrolled-back)
//! └── cursor: CursorBlink      (presentation-only blink clock)
//! ```
//!
//! The reducer in `update.rs` is the only code that mutates this state.
//! The reveal snapshot is replaced wholesale; it is never edited in place.

use std::time::{Duration, Instant};

use bootseq_core::RevealState;
use bootseq_core::config::{Config, EffectsConfig};

use crate::common::TaskState;
use crate::cursor::CursorBlink;

/// Presentation options resolved from config and command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct BootOptions {
    pub show_timestamps: bool,
    pub effects: EffectsConfig,
    pub cursor_blink: Duration,
    /// Quit on its own once the sequence has been complete for `hold_after_complete`.
    pub exit_on_complete: bool,
    pub hold_after_complete: Duration,
}

impl BootOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            show_timestamps: config.show_timestamps,
            effects: config.effects.clone(),
            cursor_blink: config.cursor_blink(),
            exit_on_complete: false,
            hold_after_complete: config.hold_after_complete(),
        }
    }
}

impl Default for BootOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Scroll position of the boot log.
///
/// While following, the view sticks to the newest line. Scrolling up pins an
/// explicit offset; scrolling back down to the end resumes following.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    follow: bool,
    offset: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            follow: true,
            offset: 0,
        }
    }
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Index of the first visible line.
    pub fn offset(&self, total: usize, viewport: usize) -> usize {
        let max = total.saturating_sub(viewport);
        if self.follow { max } else { self.offset.min(max) }
    }

    pub fn scroll_up(&mut self, lines: usize, total: usize, viewport: usize) {
        let current = self.offset(total, viewport);
        self.follow = false;
        self.offset = current.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize, total: usize, viewport: usize) {
        if self.follow {
            return;
        }
        let max = total.saturating_sub(viewport);
        let next = self.offset(total, viewport).saturating_add(lines);
        if next >= max {
            self.follow();
        } else {
            self.offset = next;
        }
    }

    pub fn to_top(&mut self) {
        self.follow = false;
        self.offset = 0;
    }

    pub fn follow(&mut self) {
        self.follow = true;
        self.offset = 0;
    }
}

/// Combined state for the boot screen.
pub struct AppState {
    pub should_quit: bool,
    pub options: BootOptions,
    /// Latest snapshot received from the reveal engine.
    pub reveal: RevealState,
    pub reveal_task: TaskState,
    pub scroll: ScrollState,
    pub cursor: CursorBlink,
    /// Runtime clock as of the last tick.
    pub now: Instant,
    /// Tick time at which the complete snapshot arrived.
    pub completed_at: Option<Instant>,
    /// Frame counter; seeds the grain overlay.
    pub frame: u64,
    /// Terminal size as of the last frame.
    pub size: (u16, u16),
}

impl AppState {
    pub fn new(options: BootOptions, total_lines: usize, now: Instant) -> Self {
        Self {
            should_quit: false,
            cursor: CursorBlink::new(now, options.cursor_blink),
            options,
            reveal: RevealState::initial(total_lines),
            reveal_task: TaskState::default(),
            scroll: ScrollState::default(),
            now,
            completed_at: None,
            frame: 0,
            size: (0, 0),
        }
    }

    /// Number of rows the boot log occupies: one per revealed line plus the
    /// cursor row.
    pub fn log_line_count(&self) -> usize {
        self.reveal.revealed().len() + 1
    }
}
