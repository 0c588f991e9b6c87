//! TTL Expiry Scheduler
//!
//! Runs one-shot actions after a delay, used to remove cache entries when
//! their time-to-live elapses.

use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{CacheError, Result};

/// Schedules delayed one-shot actions on a tokio runtime.
///
/// A dedicated scheduler owns a small multi-thread runtime that lives as long
/// as the scheduler and is shut down in the background on drop, so a cache can
/// be dropped from async and sync code alike. Expiry never runs on the
/// caller's runtime unless it is handed over with [`ExpiryScheduler::from_handle`].
#[derive(Debug)]
pub struct ExpiryScheduler {
    handle: Handle,
    runtime: Option<Runtime>,
}

impl ExpiryScheduler {
    /// Starts a dedicated multi-thread runtime for expiry actions.
    pub fn dedicated(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(CacheError::InvalidConfig(
                "expiry_workers must be greater than 0".to_string(),
            ));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("lru-expiry")
            .enable_time()
            .build()?;

        info!(workers, "Started dedicated TTL expiry runtime");

        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
        })
    }

    /// Schedules expiry actions on an existing runtime.
    ///
    /// The runtime must have the time driver enabled and must keep being
    /// driven for as long as the cache lives, otherwise entries are only
    /// removed by reads and [`purge_expired`](crate::LruCache::purge_expired).
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            handle,
            runtime: None,
        }
    }

    /// Returns true if this scheduler owns its runtime.
    pub fn is_dedicated(&self) -> bool {
        self.runtime.is_some()
    }

    /// Runs `action` once after `delay` has elapsed.
    ///
    /// The action is cancelled if the returned handle is cancelled or dropped
    /// before the delay elapses.
    pub fn spawn_after<F>(&self, delay: Duration, action: F) -> ExpiryHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });

        ExpiryHandle { task }
    }
}

impl Drop for ExpiryScheduler {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
            debug!("TTL expiry runtime shut down");
        }
    }
}

/// Owned handle to a scheduled expiry action.
///
/// Dropping the handle cancels the action if it has not run yet.
#[derive(Debug)]
pub struct ExpiryHandle {
    task: JoinHandle<()>,
}

impl ExpiryHandle {
    /// Cancels the action if it has not run yet.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns true once the action has run or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ExpiryHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
