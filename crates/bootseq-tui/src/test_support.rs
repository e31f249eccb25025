//! Helpers shared by reducer and render tests.

use std::sync::Arc;

use bootseq_core::{Line, RevealEngine, RevealState, Script};
use futures_util::StreamExt;
use ratatui::buffer::Buffer;
use tokio_util::sync::CancellationToken;

/// Runs a full reveal of `lines` and returns every snapshot it produced.
pub async fn snapshots(lines: Vec<Line>) -> Vec<RevealState> {
    let script = Script::new(lines).unwrap();
    let engine = RevealEngine::new(Arc::new(script));
    engine
        .start(CancellationToken::new())
        .unwrap()
        .collect()
        .await
}

/// The completed snapshot of a full reveal of `lines`.
pub async fn final_state(lines: Vec<Line>) -> RevealState {
    snapshots(lines).await.pop().unwrap()
}

/// Buffer contents as one string per row.
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    (buf.area.top()..buf.area.bottom())
        .map(|y| {
            (buf.area.left()..buf.area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect()
        })
        .collect()
}
