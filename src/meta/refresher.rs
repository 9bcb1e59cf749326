use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::cache::MetaCache;

/// Background task that reloads the metadata cache on a fixed interval.
pub struct MetaRefresher;

impl MetaRefresher {
    /// The first reload happens one `period` after spawning; the startup load is
    /// expected to have run already.
    pub fn spawn(cache: Arc<MetaCache>, period: Duration) -> RefreshHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_secs = period.as_secs(), "Metadata refresher started");

            'refresh: loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break 'refresh,
                    _ = ticker.tick() => {
                        debug!("Refreshing metadata cache");
                        tokio::select! {
                            _ = cache.load() => {}
                            _ = &mut shutdown_rx => break 'refresh,
                        }
                    }
                }
            }

            info!("Metadata refresher stopped");
        });

        RefreshHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Owned by the process lifecycle; `stop` ends the loop and waits for it.
/// Dropping the handle without `stop` also ends the loop.
pub struct RefreshHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub async fn stop(self) {
        // Err means the task already exited
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            warn!("Metadata refresher ended abnormally: {}", e);
        }
    }
}
