//! Teardown handle for background work started by the stores.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns listener tasks and timers started on behalf of a caller.
///
/// Closing (or dropping) the subscription cancels its token and aborts every
/// task. Stores check the token before applying an update, so nothing
/// reaches the state after `close` returns.
#[derive(Debug)]
pub struct Subscription {
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self {
            token,
            tasks: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stops every task. Idempotent.
    pub fn close(&mut self) {
        self.token.cancel();
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}
