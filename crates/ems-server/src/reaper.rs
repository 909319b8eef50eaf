//! Background task that permanently deletes expired sessions.
//!
//! Logout only deactivates a session; this task is what eventually
//! removes the row. A crashed or skipped run is harmless — expired
//! sessions are already unusable, and the next tick catches up.

use std::time::Duration;

use ems_core::repository::SessionRepository;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Periodic expired-session deleter.
pub struct SessionReaper<S> {
    sessions: S,
    interval: Duration,
}

impl<S> SessionReaper<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(sessions: S) -> Self {
        Self {
            sessions,
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// One reaping pass. Failures are logged and swallowed so a
    /// transient storage error never kills the loop.
    pub async fn run_once(&self) {
        match self.sessions.delete_expired().await {
            Ok(0) => {}
            Ok(removed) => info!(removed, "deleted expired sessions"),
            Err(e) => warn!(error = %e, "session cleanup failed"),
        }
    }

    /// Start the periodic loop on the runtime. The first pass runs
    /// immediately so a restart does not wait a full interval to catch
    /// up on a backlog.
    pub fn spawn(self) -> ReaperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.run_once().await,
                    _ = shutdown_rx.changed() => {
                        info!("session reaper stopping");
                        break;
                    }
                }
            }
        });

        ReaperHandle { shutdown_tx, task }
    }
}

/// Handle for stopping a spawned reaper.
pub struct ReaperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Signal the loop to stop and wait for it to finish.
    pub async fn shutdown(self) {
        // The receiver is gone only if the task already exited.
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}
