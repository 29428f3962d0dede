//! Task polling utilities
//!
//! Helpers for polling tasks spawned on the tokio runtime from a
//! frame-driven UI loop without blocking it.

use std::future::Future;

use futures::FutureExt;
use tokio::task::JoinHandle;

/// Result of polling a task
pub enum PollResult<T> {
    /// No task to poll
    NoTask,
    /// Task is still running
    Pending,
    /// Task completed with result (may be Ok or join error)
    Complete(Result<T, tokio::task::JoinError>),
}

/// Poll an optional task handle and return its result if finished.
///
/// # Example
/// ```ignore
/// match poll_task(&mut self.task) {
///     PollResult::Complete(Ok(Ok(page))) => { /* success */ }
///     PollResult::Complete(Ok(Err(e))) => { /* request failed */ }
///     PollResult::Complete(Err(e)) => { /* task panicked */ }
///     PollResult::Pending | PollResult::NoTask => {}
/// }
/// ```
pub fn poll_task<T>(task: &mut Option<JoinHandle<T>>) -> PollResult<T> {
    match task {
        None => return PollResult::NoTask,
        Some(handle) if !handle.is_finished() => return PollResult::Pending,
        Some(_) => {}
    }

    let Some(handle) = task.take() else {
        return PollResult::NoTask;
    };
    match handle.now_or_never() {
        Some(result) => PollResult::Complete(result),
        None => {
            // Shouldn't happen since we checked is_finished()
            tracing::warn!("Task not ready despite is_finished()");
            PollResult::Pending
        }
    }
}

/// Monotonic identifier of one request within a logical action
pub type RequestToken = u64;

/// Tracks the requests issued for one logical action and only ever yields
/// the result of the most recent one.
///
/// Earlier requests are left to finish; their results are dropped when they
/// complete so a slow stale response can never overwrite a newer one.
pub struct LatestTask<T> {
    next_token: RequestToken,
    latest: Option<(RequestToken, JoinHandle<T>)>,
    stale: Vec<(RequestToken, JoinHandle<T>)>,
}

impl<T> Default for LatestTask<T> {
    fn default() -> Self {
        Self {
            next_token: 0,
            latest: None,
            stale: Vec::new(),
        }
    }
}

impl<T: Send + 'static> LatestTask<T> {
    /// Spawn a request, superseding any earlier one. Must be called within a tokio runtime.
    pub fn spawn<F>(&mut self, future: F) -> RequestToken
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.next_token += 1;
        let token = self.next_token;
        if let Some(previous) = self.latest.take() {
            self.stale.push(previous);
        }
        self.latest = Some((token, tokio::spawn(future)));
        token
    }
}

impl<T> LatestTask<T> {
    /// Whether the most recent request is still outstanding
    pub fn is_pending(&self) -> bool {
        self.latest.is_some()
    }

    /// Forget every outstanding request. Their results will never be observed.
    pub fn clear(&mut self) {
        if let Some((_, handle)) = self.latest.take() {
            self.stale.push((0, handle));
        }
    }

    /// Poll for the latest request's result, discarding finished stale ones
    pub fn poll(&mut self) -> PollResult<T> {
        self.stale.retain(|(token, handle)| {
            if handle.is_finished() {
                tracing::debug!("Discarding stale response (request {})", token);
                false
            } else {
                true
            }
        });

        let Some((token, handle)) = self.latest.take() else {
            return PollResult::NoTask;
        };

        let mut slot = Some(handle);
        match poll_task(&mut slot) {
            PollResult::Pending => {
                if let Some(handle) = slot {
                    self.latest = Some((token, handle));
                }
                PollResult::Pending
            }
            other => other,
        }
    }
}
