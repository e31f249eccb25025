//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer decides *when* to start or cancel the reveal; the runtime
//! owns spawning and calls `token.cancel()`.

use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Spawn the reveal task.
    StartReveal,

    /// Cancel the running reveal task.
    CancelReveal { token: CancellationToken },
}
