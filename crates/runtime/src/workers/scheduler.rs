//! Delayed one-shot continuations.
//!
//! Respawn countdowns and other waits are scheduled here instead of sleeping
//! inside an action. Every continuation must re-check that its subject still
//! exists before touching it.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::sleep;

use crate::api::Result;
use crate::live::lock;

#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Mutex<Vec<AbortHandle>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` once after `delay`.
    pub fn schedule_once<F>(&self, delay: Duration, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            task.await;
        });
        let mut pending = lock(&self.pending)?;
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle.abort_handle());
        Ok(())
    }

    /// Continuations that have not run yet.
    pub fn pending(&self) -> Result<usize> {
        let mut pending = lock(&self.pending)?;
        pending.retain(|handle| !handle.is_finished());
        Ok(pending.len())
    }

    /// Cancels everything still waiting.
    pub fn shutdown(&self) -> Result<usize> {
        let mut pending = lock(&self.pending)?;
        let cancelled = pending.len();
        for handle in pending.drain(..) {
            handle.abort();
        }
        Ok(cancelled)
    }
}
