//! Restart-on-input timer
//!
//! Every [`Debouncer::schedule`] cancels whatever is still waiting and
//! starts a fresh delay, so of a burst of inputs only the last one runs.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Delay between the last keystroke and the query it triggers
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(420);

/// A scheduled run that may still be cancelled
#[derive(Debug)]
pub struct DebounceHandle {
    token: CancellationToken,
    task: JoinHandle<bool>,
}

impl DebounceHandle {
    /// Cancel the run if its delay has not elapsed yet
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the outcome: `true` if the task ran, `false` if it was cancelled
    pub async fn fired(self) -> bool {
        self.task.await.unwrap_or(false)
    }
}

/// Schedules tasks so that a new one replaces the one still waiting
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<CancellationToken>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the delay unless another task is scheduled first
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, task: F) -> DebounceHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        let waiter = token.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::select! {
                () = waiter.cancelled() => false,
                () = tokio::time::sleep(delay) => {
                    task.await;
                    true
                }
            }
        });

        self.pending = Some(token.clone());
        DebounceHandle { token, task }
    }

    /// Cancel the waiting task, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
