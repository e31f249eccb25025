//! Boot screen runtime: owns the terminal, runs the event loop, executes
//! effects.
//!
//! All side effects happen here. The reducer stays pure and produces effects;
//! this module executes them.
//!
//! The reveal stream runs in a spawned task that forwards every snapshot to
//! the inbox. The runtime drains the inbox each loop iteration, so the engine
//! never waits on rendering.

mod inbox;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bootseq_core::core::interrupt;
use bootseq_core::{RevealEngine, RevealStream};
use crossterm::event;
use futures_util::StreamExt;
use inbox::{UiEventReceiver, UiEventSender};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, BootOptions};
use crate::terminal::{self, BootTerminal};
use crate::{render, update};

/// Tick cadence while something is animating (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick cadence once the screen is static apart from the cursor.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen boot runtime.
///
/// Terminal state is restored on drop, panic, or Ctrl+C.
pub struct TuiRuntime {
    terminal: BootTerminal,
    pub state: AppState,
    engine: RevealEngine,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    pub fn new(options: BootOptions, engine: RevealEngine) -> Result<Self> {
        terminal::install_panic_hook();
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let now = Instant::now();
        let state = AppState::new(options, engine.script().len(), now);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            engine,
            inbox_tx,
            inbox_rx,
            last_tick: now,
        })
    }

    /// Runs until the user quits, the sequence auto-exits, or Ctrl+C arrives.
    ///
    /// Must be called from inside a Tokio runtime; the reveal task is spawned
    /// onto it.
    pub fn run(&mut self) -> Result<()> {
        let effects = update::init(&self.state);
        self.execute_effects(effects);

        let mut dirty = true;
        while !self.state.should_quit {
            if interrupt::is_interrupted() {
                self.dispatch_event(UiEvent::Interrupted);
                break;
            }

            let mut events = self.collect_events()?;

            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                // Only Tick triggers render; this caps the frame rate.
                if matches!(&event, UiEvent::Tick { .. }) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty && !self.state.should_quit {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        info!(
            revealed = self.state.reveal.progress().0,
            complete = self.state.reveal.is_complete(),
            "Boot screen closed"
        );
        Ok(())
    }

    /// Collects terminal input and inbox events, plus a Tick when one is due.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let animating = !self.state.reveal.is_complete() || self.state.options.effects.grain;
        let tick_interval = if animating {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            let now = Instant::now();
            events.push(UiEvent::Tick { now });
            self.last_tick = now;
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        if !effects.is_empty() {
            self.execute_effects(effects);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::StartReveal => {
                let cancel = CancellationToken::new();
                match self.engine.start(cancel.clone()) {
                    Ok(stream) => {
                        self.dispatch_event(UiEvent::RevealStarted { cancel });
                        spawn_reveal(stream, self.inbox_tx.clone());
                    }
                    Err(err) => warn!("Not starting reveal: {err}"),
                }
            }
            UiEffect::CancelReveal { token } => {
                debug!("Cancelling reveal");
                token.cancel();
            }
        }
    }
}

/// Forwards every snapshot to the inbox, then reports the end of the stream.
fn spawn_reveal(mut stream: RevealStream, tx: UiEventSender) {
    tokio::spawn(async move {
        while let Some(state) = stream.next().await {
            if tx.send(UiEvent::Reveal(state)).is_err() {
                // Runtime is gone; dropping the stream stops the engine.
                return;
            }
        }
        let _ = tx.send(UiEvent::RevealEnded);
    });
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        if let Some(token) = self.state.reveal_task.take() {
            token.cancel();
        }
        let _ = terminal::restore_terminal();
    }
}
