//! Background turn loop

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::engine::Engine;

/// Running turn loop. Dropping the handle leaves the loop running; call
/// [`TurnHandle::shutdown`] to stop it.
pub struct TurnHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TurnHandle {
    /// Signal the loop to stop and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            log::error!("Turn driver task failed: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Run `Engine::run_one_turn` every `period` on the current tokio runtime.
///
/// Ticks that fall behind are skipped rather than bunched up, so a slow turn
/// never causes a burst of catch-up turns.
pub fn spawn_turns(engine: Arc<Mutex<Engine>>, period: Duration) -> TurnHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        log::info!("Turn driver started ({} ms per turn)", period.as_millis());

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let stats = engine.lock().await.run_one_turn();
                    if stats.queues_dropped > 0 {
                        log::warn!("Dropped {} change queues this turn", stats.queues_dropped);
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        log::info!("Turn driver stopped");
    });

    TurnHandle { shutdown_tx, task }
}
