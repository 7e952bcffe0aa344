//! Background expiry sweep for the memory backend.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::store::MemoryCache;

const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Handle to the running sweep task. Dropping the handle without calling
/// [`CacheSweeper::shutdown`] aborts the task.
pub struct CacheSweeper {
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CacheSweeper {
    pub fn start(cache: Arc<MemoryCache>, interval: Duration) -> Self {
        let (stop, mut stopped) = oneshot::channel::<()>();
        let period = interval.max(MIN_INTERVAL);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // Skip the first immediate tick

            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let removed = cache.sweep();
                        if removed > 0 {
                            debug!(removed, remaining = cache.len(), "Swept expired cache entries");
                        }
                    }
                }
            }
        });

        info!(interval_ms = period.as_millis() as u64, "Cache sweeper started");
        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// Stop the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                warn!(error = %err, "Cache sweeper terminated abnormally");
            }
        }
        info!("Cache sweeper stopped");
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
