use tokio_util::sync::CancellationToken;

/// Lifecycle of the background reveal task (stored in `AppState`, mutated
/// only by the reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn on_started(&mut self, cancel: CancellationToken) {
        self.cancel = Some(cancel);
    }

    /// Clears the task, returning its token so the caller can cancel it.
    pub fn take(&mut self) -> Option<CancellationToken> {
        self.cancel.take()
    }
}
