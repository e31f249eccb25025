//! Full-screen CRT boot screen for bootseq.

pub mod common;
pub mod crt;
pub mod cursor;
pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod style;
pub mod terminal;
pub mod update;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Result;
use bootseq_core::{RevealEngine, Script};
pub use runtime::TuiRuntime;
pub use state::BootOptions;
use tracing::info;

/// Plays `script` on the boot screen until the user quits.
///
/// Requires an interactive terminal; fails early otherwise.
pub async fn run_boot_screen(script: Script, options: BootOptions) -> Result<()> {
    terminal::ensure_tty()?;

    info!(
        lines = script.len(),
        total_ms = script.total_duration().as_millis() as u64,
        exit_on_complete = options.exit_on_complete,
        "Starting boot screen"
    );

    let engine = RevealEngine::new(Arc::new(script));
    let mut runtime = TuiRuntime::new(options, engine)?;
    runtime.run()
}
