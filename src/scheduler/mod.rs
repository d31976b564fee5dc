//! Periodic tick scheduling.
//!
//! The engine asks a [`Scheduler`] to deliver a recurring tick and keeps the
//! returned [`TickHandle`] as its only cancellation capability. Schedulers
//! never call into the engine themselves; they deliver [`TickId`]s to the
//! host loop, which forwards them to `CountdownEngine::tick`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  schedule_repeating  ┌──────────────────┐
//! │ CountdownEngine  │─────────────────────▶│    Scheduler     │
//! │                  │◀──── TickHandle ─────│                  │
//! └────────▲─────────┘                      └────────┬─────────┘
//!          │ tick(id)                                │ TickId
//!          │            ┌──────────────────┐         │
//!          └────────────│    host loop     │◀────────┘
//!                       └──────────────────┘
//! ```

mod manual;
mod runtime;

use std::fmt;
use std::time::Duration;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

/// Identifies one recurring schedule.
///
/// Each `start`/`resume` installs a schedule under a fresh id, so ticks that
/// were already in flight for a cancelled schedule can be recognised and
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(u64);

impl TickId {
    /// The id handed out for the first schedule.
    pub const fn first() -> Self {
        Self(1)
    }

    /// Returns the id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability to run a recurring tick at a fixed interval.
pub trait Scheduler {
    /// Starts delivering `id` every `interval`, first delivery one interval
    /// from now. Dropping or cancelling the returned handle stops delivery.
    fn schedule_repeating(&self, interval: Duration, id: TickId) -> TickHandle;
}

/// Cancellation handle for one recurring schedule.
///
/// Cancellation happens synchronously, either explicitly through
/// [`TickHandle::cancel`] or when the handle is dropped.
pub struct TickHandle {
    id: TickId,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    pub fn new(id: TickId, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Returns the id of the schedule this handle controls.
    pub fn id(&self) -> TickId {
        self.id
    }

    /// Stops the schedule.
    pub fn cancel(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickHandle")
            .field("id", &self.id)
            .field("cancelled", &self.cancel.is_none())
            .finish()
    }
}
