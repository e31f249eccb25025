//! Boot screen reducer.
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::render;
use crate::state::AppState;

/// Effects to run once before the first event.
pub fn init(_app: &AppState) -> Vec<UiEffect> {
    vec![UiEffect::StartReveal]
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick { now } => {
            app.now = now;
            app.frame = app.frame.wrapping_add(1);
            if app.options.exit_on_complete
                && let Some(completed_at) = app.completed_at
                && now.saturating_duration_since(completed_at) >= app.options.hold_after_complete
            {
                debug!("hold after completion elapsed, quitting");
                return quit(app);
            }
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.size = (width, height);
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::RevealStarted { cancel } => {
            app.reveal_task.on_started(cancel);
            vec![]
        }
        UiEvent::Reveal(state) => {
            // Late snapshots from a cancelled run, or anything older than what
            // we already show, are dropped.
            if !app.reveal_task.is_running()
                || state.revealed().len() < app.reveal.revealed().len()
            {
                return vec![];
            }
            if state.is_complete() && app.completed_at.is_none() {
                app.completed_at = Some(app.now);
            }
            app.reveal = state;
            vec![]
        }
        UiEvent::RevealEnded => {
            app.reveal_task.take();
            vec![]
        }
        UiEvent::Interrupted => quit(app),
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let total = app.log_line_count();
    let viewport = render::log_viewport_height(app.size.1);
    let page = viewport.max(1);

    match key.code {
        KeyCode::Char('c') if ctrl => return quit(app),
        KeyCode::Char('q') | KeyCode::Esc => return quit(app),
        KeyCode::Up | KeyCode::Char('k') => app.scroll.scroll_up(1, total, viewport),
        KeyCode::Down | KeyCode::Char('j') => app.scroll.scroll_down(1, total, viewport),
        KeyCode::PageUp => app.scroll.scroll_up(page, total, viewport),
        KeyCode::PageDown => app.scroll.scroll_down(page, total, viewport),
        KeyCode::Home | KeyCode::Char('g') => app.scroll.to_top(),
        KeyCode::End | KeyCode::Char('G') => app.scroll.follow(),
        _ => {}
    }
    vec![]
}

/// Marks the app for exit, cancelling the reveal if it is still running.
fn quit(app: &mut AppState) -> Vec<UiEffect> {
    app.should_quit = true;
    let mut effects = Vec::with_capacity(2);
    if let Some(token) = app.reveal_task.take() {
        effects.push(UiEffect::CancelReveal { token });
    }
    effects.push(UiEffect::Quit);
    effects
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use bootseq_core::Line;
    use bootseq_core::config::EffectsConfig;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::state::BootOptions;
    use crate::test_support::{final_state, snapshots};

    fn app() -> AppState {
        let mut app = AppState::new(
            BootOptions {
                effects: EffectsConfig::disabled(),
                ..BootOptions::default()
            },
            2,
            Instant::now(),
        );
        app.size = (80, 10);
        app
    }

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn two_lines() -> Vec<Line> {
        vec![
            Line::new("a", "first").with_delay_ms(0),
            Line::new("b", "second").with_delay_ms(0),
        ]
    }

    fn started(app: &mut AppState) -> CancellationToken {
        let token = CancellationToken::new();
        update(
            app,
            UiEvent::RevealStarted {
                cancel: token.clone(),
            },
        );
        token
    }

    #[test]
    fn test_init_starts_reveal() {
        let effects = init(&app());
        assert!(matches!(effects.as_slice(), [UiEffect::StartReveal]));
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = app();
            let effects = update(&mut app, key(code));
            assert!(app.should_quit);
            assert!(matches!(effects.as_slice(), [UiEffect::Quit]));
        }

        let mut app = app();
        let ctrl_c = UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        update(&mut app, ctrl_c);
        assert!(app.should_quit);
    }

    #[test]
    fn test_quit_cancels_running_reveal() {
        let mut app = app();
        let token = started(&mut app);

        let effects = update(&mut app, key(KeyCode::Char('q')));
        match effects.as_slice() {
            [UiEffect::CancelReveal { token: t }, UiEffect::Quit] => {
                t.cancel();
                assert!(token.is_cancelled());
            }
            other => panic!("unexpected effects: {other:?}"),
        }
        assert!(!app.reveal_task.is_running());
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut app = app();
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        update(&mut app, UiEvent::Terminal(Event::Key(release)));
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_reveal_snapshots_replace_state() {
        let states = snapshots(two_lines()).await;
        let mut app = app();
        started(&mut app);

        update(&mut app, UiEvent::Reveal(states[0].clone()));
        assert_eq!(app.reveal.revealed_ids(), vec!["a"]);
        assert!(app.completed_at.is_none());

        update(&mut app, UiEvent::Reveal(states[2].clone()));
        assert!(app.reveal.is_complete());
        assert_eq!(app.completed_at, Some(app.now));

        // An older snapshot never rolls the view back.
        update(&mut app, UiEvent::Reveal(states[0].clone()));
        assert_eq!(app.reveal.revealed_ids(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_snapshots_after_end_are_dropped() {
        let states = snapshots(two_lines()).await;
        let mut app = app();
        started(&mut app);
        update(&mut app, UiEvent::RevealEnded);

        update(&mut app, UiEvent::Reveal(states[0].clone()));
        assert!(app.reveal.revealed().is_empty());
    }

    #[tokio::test]
    async fn test_exit_on_complete_waits_for_hold() {
        let mut app = app();
        app.options.exit_on_complete = true;
        app.options.hold_after_complete = Duration::from_millis(1500);
        started(&mut app);

        let start = app.now;
        let done = final_state(two_lines()).await;
        update(&mut app, UiEvent::Reveal(done));

        update(
            &mut app,
            UiEvent::Tick {
                now: start + Duration::from_millis(1000),
            },
        );
        assert!(!app.should_quit);

        let effects = update(
            &mut app,
            UiEvent::Tick {
                now: start + Duration::from_millis(1500),
            },
        );
        assert!(app.should_quit);
        assert!(matches!(effects.last(), Some(UiEffect::Quit)));
    }

    #[tokio::test]
    async fn test_completion_without_exit_flag_keeps_running() {
        let mut app = app();
        started(&mut app);
        let start = app.now;
        let done = final_state(two_lines()).await;
        update(&mut app, UiEvent::Reveal(done));

        update(
            &mut app,
            UiEvent::Tick {
                now: start + Duration::from_secs(60),
            },
        );
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_scroll_keys() {
        let lines: Vec<Line> = (0..20)
            .map(|i| Line::new(format!("l{i}"), "x").with_delay_ms(0))
            .collect();
        let done = final_state(lines).await;
        let mut app = app();
        started(&mut app);
        update(&mut app, UiEvent::Reveal(done));
        // 21 rows in a 7-row viewport.
        assert_eq!(app.scroll.offset(21, 7), 14);

        update(&mut app, key(KeyCode::Up));
        assert!(!app.scroll.is_following());
        assert_eq!(app.scroll.offset(21, 7), 13);

        update(&mut app, key(KeyCode::PageUp));
        assert_eq!(app.scroll.offset(21, 7), 6);

        update(&mut app, key(KeyCode::Home));
        assert_eq!(app.scroll.offset(21, 7), 0);

        update(&mut app, key(KeyCode::PageDown));
        assert_eq!(app.scroll.offset(21, 7), 7);

        update(&mut app, key(KeyCode::End));
        assert!(app.scroll.is_following());
    }

    #[test]
    fn test_interrupt_quits() {
        let mut app = app();
        let effects = update(&mut app, UiEvent::Interrupted);
        assert!(app.should_quit);
        assert!(matches!(effects.as_slice(), [UiEffect::Quit]));
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut app = app();
        let later = app.now + Duration::from_millis(16);
        update(&mut app, UiEvent::Tick { now: later });
        assert_eq!(app.frame, 1);
        assert_eq!(app.now, later);
    }
}
