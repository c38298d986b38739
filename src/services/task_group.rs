use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, error};
use tokio::runtime::Handle;
use tokio::sync::Notify;

use crate::errors::BuildError;
use crate::types::{BuildSummary, TaskOutcome};

#[derive(Default)]
struct Counters {
    pending: AtomicUsize,
    registered: AtomicUsize,
    rendered: AtomicUsize,
    copied: AtomicUsize,
    failed: AtomicUsize,
    idle: Notify,
}

/// Group of conversion tasks with a completion barrier.
///
/// `spawn` registers the task before it is handed to the runtime and gives
/// the task a [`Slot`] that releases the registration when dropped, so every
/// exit path of the task (success, error, panic) is counted exactly once.
#[derive(Clone)]
pub struct TaskGroup {
    counters: Arc<Counters>,
    handle: Handle,
}

impl TaskGroup {
    pub fn new(handle: Handle) -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            handle,
        }
    }

    /// Group bound to the runtime of the calling context
    pub fn current() -> Result<Self, BuildError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| BuildError::Runtime(e.to_string()))
    }

    /// Run `task` on the blocking pool
    pub fn spawn<F>(&self, task: F)
    where
        F: FnOnce() -> Result<TaskOutcome, BuildError> + Send + 'static,
    {
        let slot = self.register();
        self.handle.spawn_blocking(move || {
            let mut slot = slot;
            slot.outcome = Some(task());
        });
    }

    fn register(&self) -> Slot {
        self.counters.registered.fetch_add(1, Ordering::Relaxed);
        self.counters.pending.fetch_add(1, Ordering::AcqRel);
        Slot {
            counters: Arc::clone(&self.counters),
            outcome: None,
        }
    }

    /// Tasks registered and not yet finished
    pub fn pending(&self) -> usize {
        self.counters.pending.load(Ordering::Acquire)
    }

    /// Wait until every registered task has finished.
    ///
    /// Only meaningful once the caller has stopped spawning into this group.
    pub async fn wait(&self) -> BuildSummary {
        loop {
            let notified = self.counters.idle.notified();
            tokio::pin!(notified);
            // Register interest before checking, so a release between the
            // check and the await still wakes us.
            notified.as_mut().enable();
            if self.pending() == 0 {
                break;
            }
            notified.await;
        }
        debug!(
            "All {} tasks finished",
            self.counters.registered.load(Ordering::Relaxed)
        );
        self.summary()
    }

    /// Task totals so far
    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            rendered: self.counters.rendered.load(Ordering::Acquire),
            copied: self.counters.copied.load(Ordering::Acquire),
            failed: self.counters.failed.load(Ordering::Acquire),
            ..BuildSummary::default()
        }
    }
}

/// A task's registration in its group
struct Slot {
    counters: Arc<Counters>,
    outcome: Option<Result<TaskOutcome, BuildError>>,
}

impl Drop for Slot {
    fn drop(&mut self) {
        let tally = match self.outcome.take() {
            Some(Ok(TaskOutcome::Rendered)) => &self.counters.rendered,
            Some(Ok(TaskOutcome::Copied)) => &self.counters.copied,
            Some(Err(_)) => &self.counters.failed,
            None => {
                error!("Conversion task panicked");
                &self.counters.failed
            }
        };
        tally.fetch_add(1, Ordering::AcqRel);
        if self.counters.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.counters.idle.notify_waiters();
        }
    }
}
