//! Events consumed by the reducer.

use std::time::Instant;

use bootseq_core::RevealState;
use crossterm::event::Event;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum UiEvent {
    /// Frame cadence tick carrying the runtime's clock.
    Tick { now: Instant },
    /// Current terminal size, sent before other events each loop.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(Event),
    /// The reveal task was spawned; holds its cancellation handle.
    RevealStarted { cancel: CancellationToken },
    /// A new snapshot from the reveal engine.
    Reveal(RevealState),
    /// The reveal stream ended (completed or cancelled).
    RevealEnded,
    /// Ctrl+C arrived through the signal handler rather than as a key.
    Interrupted,
}
