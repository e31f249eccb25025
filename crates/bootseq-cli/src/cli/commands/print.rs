//! Plain-text playback for pipes and non-interactive terminals.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bootseq_core::config::Config;
use bootseq_core::core::interrupt::{self, InterruptedError};
use bootseq_core::{RevealEngine, RevealedLine};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

/// Written once the sequence is complete.
pub const READY_MARKER: &str = "READY";

pub async fn run(config: &Config, script_override: Option<&Path>, timestamps: bool) -> Result<()> {
    let script = config.load_script(script_override)?;
    info!(lines = script.len(), "Printing boot sequence");
    let engine = RevealEngine::new(Arc::new(script));
    let cancel = CancellationToken::new();
    let mut stream = engine.start(cancel.clone())?;

    let mut out = io::stdout();
    let mut printed = 0;
    loop {
        tokio::select! {
            () = interrupt::wait_for_interrupt() => {
                info!(printed, "Print interrupted");
                cancel.cancel();
                return Err(InterruptedError.into());
            }
            next = stream.next() => {
                let Some(state) = next else {
                    break;
                };
                for revealed in &state.revealed()[printed..] {
                    writeln!(out, "{}", format_line(revealed, timestamps))
                        .context("write to stdout")?;
                }
                printed = state.revealed().len();
                if state.is_complete() {
                    writeln!(out, "{READY_MARKER}").context("write to stdout")?;
                }
            }
        }
    }
    Ok(())
}

fn format_line(revealed: &RevealedLine, timestamps: bool) -> String {
    if timestamps {
        format!(
            "[{}] {}",
            revealed.timestamp.format(TIMESTAMP_FORMAT),
            revealed.line.text()
        )
    } else {
        revealed.line.text().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bootseq_core::Line;
    use chrono::Local;

    use super::*;

    fn revealed(text: &str) -> RevealedLine {
        RevealedLine {
            line: Line::new("x", text),
            at: Duration::ZERO,
            timestamp: Local::now(),
        }
    }

    #[test]
    fn test_format_line_plain() {
        assert_eq!(format_line(&revealed("POST OK"), false), "POST OK");
    }

    #[test]
    fn test_format_line_with_timestamp() {
        let line = format_line(&revealed("POST OK"), true);
        assert!(line.starts_with('['));
        assert!(line.ends_with("] POST OK"));
        // [HH:MM:SS.mmm]
        assert_eq!(line.find(']'), Some(13));
    }
}
