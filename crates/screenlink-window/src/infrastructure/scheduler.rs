//! Tokio-backed timers.
//!
//! Every timer is a spawned task that only sends [`WindowMessage`]s; none of
//! them touch window state.  Periodic ticks use `try_send`: if the event loop
//! is behind, a tick is dropped rather than queued, since the next one will
//! do the same work.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::application::lifecycle::{PeriodicTask, TaskScheduler, WindowMessage};

/// [`TaskScheduler`] that spawns Tokio tasks.
///
/// Must be used from within a Tokio runtime.  Dropping the scheduler aborts
/// every timer it owns.
pub struct TokioScheduler {
    tx: mpsc::Sender<WindowMessage>,
    periodic: HashMap<PeriodicTask, JoinHandle<()>>,
    reload: Option<JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(tx: mpsc::Sender<WindowMessage>) -> Self {
        Self {
            tx,
            periodic: HashMap::new(),
            reload: None,
        }
    }

    /// Number of periodic tasks currently running.
    pub fn active_tasks(&self) -> usize {
        self.periodic.len()
    }
}

impl TaskScheduler for TokioScheduler {
    fn start_periodic(&mut self, task: PeriodicTask, period: Duration) {
        self.cancel(task);

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            // First tick one period from now, not immediately.
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match tx.try_send(WindowMessage::Tick(task)) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => trace!(?task, "event loop busy, tick dropped"),
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        });
        debug!(?task, ?period, "periodic task started");
        self.periodic.insert(task, handle);
    }

    fn cancel(&mut self, task: PeriodicTask) {
        if let Some(handle) = self.periodic.remove(&task) {
            handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        for (_, handle) in self.periodic.drain() {
            handle.abort();
        }
        if let Some(handle) = self.reload.take() {
            handle.abort();
        }
    }

    fn schedule_reload(&mut self, delay: Duration) {
        if let Some(previous) = self.reload.take() {
            previous.abort();
        }
        let tx = self.tx.clone();
        self.reload = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            if tx.send(WindowMessage::Reload).await.is_err() {
                warn!("event loop gone before reload");
            }
        }));
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
