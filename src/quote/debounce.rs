/*
 * Cancellable one-shot timer used to coalesce rapid input changes
 */

use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct DebounceScheduler {
    pending: Option<JoinHandle<()>>,
}

impl DebounceScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `callback` once `delay` has elapsed, replacing any timer that is still armed.
    pub fn schedule<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        // The deadline is fixed here, not when the task is first polled.
        let timer = tokio::time::sleep(delay);
        self.pending = Some(tokio::spawn(async move {
            timer.await;
            callback();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
