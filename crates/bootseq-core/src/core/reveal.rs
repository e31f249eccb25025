//! Timed line-reveal engine.
//!
//! The engine walks a [`Script`] in order. Before each line it waits for the
//! line's delay, then appends it to the revealed list and yields a fresh
//! [`RevealState`] snapshot. After the last line it yields one more snapshot
//! with `complete` set.
//!
//! ## Timing
//!
//! Waits are scheduled against absolute deadlines: line *k* becomes visible
//! at `start + sum(delay[0..=k])`. A slow consumer never shifts later lines.
//!
//! ## Cancellation
//!
//! The stream ends as soon as its [`CancellationToken`] is cancelled or the
//! stream is dropped. A pending wait is abandoned; no line is appended and no
//! completion is signalled after cancellation. When the token and the timer
//! are both ready at the same poll, the token is checked first.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use chrono::{DateTime, Local};
use futures_util::Stream;
use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::script::{Line, Script};

/// Errors from misusing an engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("reveal engine already started")]
    AlreadyStarted,
}

/// The two phases of a reveal run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Revealing,
    Complete,
}

/// A line as it was revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedLine {
    pub line: Line,
    /// Scheduled reveal offset: the line's deadline relative to engine start.
    ///
    /// This is the cumulative delay up to and including the line, not the
    /// moment the line was appended, so a late poll does not change it.
    pub at: Duration,
    /// Wall-clock time captured at append.
    pub timestamp: DateTime<Local>,
}

/// Immutable snapshot of a reveal run.
///
/// Snapshots share the revealed list through an `Arc`, so cloning one is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealState {
    revealed: Arc<[RevealedLine]>,
    total: usize,
    complete: bool,
}

impl RevealState {
    /// The state before anything has been revealed.
    pub fn initial(total: usize) -> Self {
        Self {
            revealed: Arc::from(Vec::new()),
            total,
            complete: false,
        }
    }

    pub fn revealed(&self) -> &[RevealedLine] {
        &self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn phase(&self) -> Phase {
        if self.complete {
            Phase::Complete
        } else {
            Phase::Revealing
        }
    }

    /// Returns `(revealed, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.revealed.len(), self.total)
    }

    /// Ids of the revealed lines, in order.
    pub fn revealed_ids(&self) -> Vec<&str> {
        self.revealed.iter().map(|r| r.line.id()).collect()
    }
}

/// Reveals a script one line at a time.
///
/// An engine runs at most once; create a new engine to replay a script.
#[derive(Debug)]
pub struct RevealEngine {
    script: Arc<Script>,
    started: AtomicBool,
}

impl RevealEngine {
    pub fn new(script: Arc<Script>) -> Self {
        Self {
            script,
            started: AtomicBool::new(false),
        }
    }

    pub fn script(&self) -> &Arc<Script> {
        &self.script
    }

    /// Starts the reveal run and returns its snapshot stream.
    ///
    /// The stream is lazy: the clock starts on its first poll.
    ///
    /// # Errors
    /// Returns [`EngineError::AlreadyStarted`] if this engine was started before.
    pub fn start(&self, cancel: CancellationToken) -> Result<RevealStream, EngineError> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Ignoring second start of reveal engine");
            return Err(EngineError::AlreadyStarted);
        }
        Ok(RevealStream::new(Arc::clone(&self.script), cancel))
    }
}

/// Stream of [`RevealState`] snapshots produced by [`RevealEngine::start`].
pub struct RevealStream {
    inner: BoxStream<'static, RevealState>,
}

impl RevealStream {
    fn new(script: Arc<Script>, cancel: CancellationToken) -> Self {
        let run = Run {
            revealed: Vec::with_capacity(script.len()),
            script,
            cancel,
            next: 0,
            clock: None,
            finished: false,
        };
        Self {
            inner: stream::unfold(run, Run::step).fuse().boxed(),
        }
    }
}

impl Stream for RevealStream {
    type Item = RevealState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for RevealStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealStream").finish_non_exhaustive()
    }
}

/// Start instant and the deadline of the most recent line.
#[derive(Clone, Copy)]
struct Clock {
    start: Instant,
    deadline: Instant,
}

/// Engine-owned state of one run. The only writer of the revealed list.
struct Run {
    script: Arc<Script>,
    cancel: CancellationToken,
    revealed: Vec<RevealedLine>,
    next: usize,
    clock: Option<Clock>,
    finished: bool,
}

impl Run {
    async fn step(mut self) -> Option<(RevealState, Self)> {
        if self.finished || self.cancel.is_cancelled() {
            return None;
        }

        let clock = *self.clock.get_or_insert_with(|| {
            let now = Instant::now();
            info!(lines = self.script.len(), "Reveal started");
            Clock {
                start: now,
                deadline: now,
            }
        });

        let Some(line) = self.script.get(self.next).cloned() else {
            self.finished = true;
            info!(lines = self.revealed.len(), "Reveal complete");
            let state = self.snapshot(true);
            return Some((state, self));
        };

        let deadline = clock.deadline + line.effective_delay();
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                info!(revealed = self.revealed.len(), "Reveal cancelled");
                return None;
            }
            () = tokio::time::sleep_until(deadline) => {}
        }

        self.clock = Some(Clock {
            start: clock.start,
            deadline,
        });
        let at = deadline.saturating_duration_since(clock.start);
        debug!(id = line.id(), at_ms = at.as_millis() as u64, "Line revealed");
        self.revealed.push(RevealedLine {
            line,
            at,
            timestamp: Local::now(),
        });
        self.next += 1;

        let state = self.snapshot(false);
        Some((state, self))
    }

    fn snapshot(&self, complete: bool) -> RevealState {
        RevealState {
            revealed: Arc::from(self.revealed.as_slice()),
            total: self.script.len(),
            complete,
        }
    }
}
