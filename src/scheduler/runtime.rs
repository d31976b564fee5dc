//! Scheduler implementation on the tokio runtime.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::{Scheduler, TickHandle, TickId};

/// Scheduler that drives each recurring tick from a tokio task.
///
/// Ticks are delivered on the channel returned by [`TokioScheduler::new`].
/// Cancelling a schedule aborts its task; ticks it already queued stay in the
/// channel and are discarded by the engine because their id is stale.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tick_tx: mpsc::UnboundedSender<TickId>,
}

impl TokioScheduler {
    /// Creates a scheduler and the receiving end of its tick channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickId>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        (Self { tick_tx }, tick_rx)
    }
}

impl Scheduler for TokioScheduler {
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime or with a zero interval.
    fn schedule_repeating(&self, period: Duration, id: TickId) -> TickHandle {
        let tick_tx = self.tick_tx.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                trace!("tick {}", id);
                if tick_tx.send(id).is_err() {
                    debug!("Tick receiver dropped, stopping schedule {}", id);
                    break;
                }
            }
        });

        debug!("Scheduled tick {} every {:?}", id, period);
        TickHandle::new(id, move || task.abort())
    }
}
