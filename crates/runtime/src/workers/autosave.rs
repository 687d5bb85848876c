//! Periodic autosave driver.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::persistence::GameStateManager;

/// Calls [`GameStateManager::auto_save_tick`] every `interval` until shut down.
///
/// Tick failures are logged and the loop keeps going; the next tick retries
/// naturally. Missed ticks are delayed rather than bursted.
pub struct AutoSaveWorker {
    manager: Arc<GameStateManager>,
    interval: Duration,
    shutdown_rx: oneshot::Receiver<()>,
}

/// Owner handle for a spawned [`AutoSaveWorker`].
pub struct AutoSaveHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl AutoSaveWorker {
    pub fn new(
        manager: Arc<GameStateManager>,
        interval: Duration,
    ) -> (Self, oneshot::Sender<()>) {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let worker = Self {
            manager,
            interval,
            shutdown_rx,
        };
        (worker, shutdown_tx)
    }

    /// Spawns the worker on the current tokio runtime.
    pub fn spawn(manager: Arc<GameStateManager>, interval: Duration) -> AutoSaveHandle {
        let (worker, shutdown_tx) = Self::new(manager, interval);
        AutoSaveHandle {
            shutdown_tx: Some(shutdown_tx),
            join: tokio::spawn(worker.run()),
        }
    }

    /// Main worker loop. The first tick fires one `interval` after start.
    pub async fn run(mut self) {
        info!("AutoSaveWorker started (interval: {:?})", self.interval);

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.manager.auto_save_tick().await {
                        Ok(Some(id)) => debug!("Autosave wrote {}", id),
                        Ok(None) => {}
                        Err(e) => error!("Autosave tick failed: {}", e),
                    }
                }
                _ = &mut self.shutdown_rx => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("AutoSaveWorker stopped");
    }
}

impl AutoSaveHandle {
    /// Signals the worker to stop and waits for it to finish its current tick.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.join).await {
            error!("AutoSaveWorker join failed: {}", e);
        }
    }
}
