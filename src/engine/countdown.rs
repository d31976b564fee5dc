//! Countdown engine.
//!
//! This module provides the core timer functionality:
//! - State transitions (Idle → Running ⇄ Paused → Finished)
//! - Wall-clock recomputation of the remaining time on every tick
//! - Display updates and finish alerts through injected sinks

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use super::error::CountdownError;
use super::ports::{AlertSink, DisplaySink, TargetInput};
use crate::clock::Clock;
use crate::scheduler::{Scheduler, TickHandle, TickId};
use crate::types::{
    clamp_millis, EngineSnapshot, TimeParts, TimerState, FLASH_DURATION, TICK_INTERVAL,
    TIMES_UP_MESSAGE,
};

// ============================================================================
// CountdownEngine
// ============================================================================

/// Countdown engine that owns the timer state and all time arithmetic.
///
/// The engine is driven from a single task: commands and ticks are applied
/// one at a time through `&mut self`, so no locking is involved.
pub struct CountdownEngine {
    /// Current timer state
    state: TimerState,
    /// Instant counted down to (running only)
    target_ms: Option<i64>,
    /// Last computed remaining duration
    remaining_ms: u64,
    /// Remaining duration captured at pause
    paused_remainder_ms: Option<u64>,
    /// Id for the next installed schedule
    next_tick_id: TickId,
    /// The one outstanding recurring tick, if any
    tick: Option<TickHandle>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
    input: Arc<dyn TargetInput>,
    display: Arc<dyn DisplaySink>,
    alerts: Arc<dyn AlertSink>,
}

impl CountdownEngine {
    /// Creates an idle engine and pushes the initial display: all-zero time
    /// and a disabled pause control.
    pub fn new(
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        input: Arc<dyn TargetInput>,
        display: Arc<dyn DisplaySink>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        let engine = Self {
            state: TimerState::Idle,
            target_ms: None,
            remaining_ms: 0,
            paused_remainder_ms: None,
            next_tick_id: TickId::first(),
            tick: None,
            clock,
            scheduler,
            input,
            display,
            alerts,
        };

        engine.display.show_pause_control(engine.state.pause_control());
        engine.update(0);
        engine
    }

    /// Starts counting down to the instant currently held by the input.
    ///
    /// Valid from any state. A countdown already in progress is replaced.
    ///
    /// # Errors
    ///
    /// Returns `MissingInput` if nothing usable is selected and `PastTarget`
    /// if the selection is not strictly after now. Nothing changes on error.
    pub fn start(&mut self) -> Result<(), CountdownError> {
        let Some(target) = self.input.target_millis() else {
            warn!("Start rejected: no target selected");
            return Err(CountdownError::MissingInput);
        };

        let now = self.clock.now_millis();
        if target <= now {
            warn!("Start rejected: target {} is not after now {}", target, now);
            return Err(CountdownError::PastTarget);
        }

        self.cancel_tick();
        self.alerts.stop_sound();

        let diff = target - now;
        self.target_ms = Some(target);
        self.remaining_ms = clamp_millis(diff);
        self.paused_remainder_ms = None;

        self.set_state(TimerState::Running);
        self.display.show_message("");
        self.update(diff);
        self.schedule_tick();

        info!("Countdown started: {} ms remaining", self.remaining_ms);
        Ok(())
    }

    /// Pauses a running countdown. Ignored in any other state.
    pub fn pause(&mut self) {
        if self.state != TimerState::Running {
            debug!("Pause ignored in state {}", self.state);
            return;
        }

        self.cancel_tick();
        self.paused_remainder_ms = Some(self.remaining_ms);
        self.target_ms = None;
        self.alerts.stop_sound();
        self.set_state(TimerState::Paused);

        info!("Countdown paused with {} ms remaining", self.remaining_ms);
    }

    /// Resumes a paused countdown. Ignored in any other state.
    ///
    /// The new target is `now + remainder`, so time spent paused does not
    /// count against the countdown.
    pub fn resume(&mut self) {
        if self.state != TimerState::Paused {
            debug!("Resume ignored in state {}", self.state);
            return;
        }

        let remainder = self.paused_remainder_ms.take().unwrap_or(self.remaining_ms);
        let remainder_ms = i64::try_from(remainder).unwrap_or(i64::MAX);
        self.target_ms = Some(self.clock.now_millis().saturating_add(remainder_ms));
        self.remaining_ms = remainder;

        self.set_state(TimerState::Running);
        self.update(remainder_ms);
        self.schedule_tick();

        info!("Countdown resumed with {} ms remaining", remainder);
    }

    /// Pauses when running, resumes when paused.
    pub fn toggle_pause_resume(&mut self) {
        match self.state {
            TimerState::Running => self.pause(),
            TimerState::Paused => self.resume(),
            TimerState::Idle | TimerState::Finished => {
                debug!("Pause/resume ignored in state {}", self.state)
            }
        }
    }

    /// Returns to idle from any state and clears the input.
    pub fn reset(&mut self) {
        self.cancel_tick();
        self.alerts.stop_sound();

        self.target_ms = None;
        self.remaining_ms = 0;
        self.paused_remainder_ms = None;

        self.update(0);
        self.display.show_message("");
        self.set_state(TimerState::Idle);
        self.input.clear();

        info!("Countdown reset");
    }

    /// Recomputes the remaining time. Called by the host for every tick the
    /// scheduler delivers.
    ///
    /// Ticks from a schedule that is no longer current are ignored.
    pub fn tick(&mut self, id: TickId) {
        if self.current_tick() != Some(id) || self.state != TimerState::Running {
            trace!("Dropping stale tick {}", id);
            return;
        }

        let Some(target) = self.target_ms else {
            return;
        };

        let diff = target - self.clock.now_millis();
        if diff <= 0 {
            self.finish();
            return;
        }

        self.remaining_ms = clamp_millis(diff);
        trace!("tick {}: {} ms remaining", id, self.remaining_ms);
        self.update(diff);
    }

    /// Pushes the decomposition of `ms` to the display. Negative values are
    /// shown as zero.
    pub fn update(&self, ms: i64) {
        self.display.show_time(TimeParts::from_millis(ms));
    }

    /// Releases the scheduled tick and silences the alarm.
    pub fn dispose(&mut self) {
        self.cancel_tick();
        self.alerts.stop_sound();
        debug!("Countdown engine disposed");
    }

    fn finish(&mut self) {
        self.cancel_tick();
        self.target_ms = None;
        self.remaining_ms = 0;
        self.paused_remainder_ms = None;

        self.update(0);
        self.set_state(TimerState::Finished);
        self.display.show_message(TIMES_UP_MESSAGE);
        self.alerts.flash(FLASH_DURATION);
        self.alerts.play_sound();

        info!("Countdown finished");
    }

    fn set_state(&mut self, state: TimerState) {
        self.state = state;
        self.display.show_pause_control(state.pause_control());
    }

    fn schedule_tick(&mut self) {
        self.cancel_tick();

        let id = self.next_tick_id;
        self.next_tick_id = id.next();
        self.tick = Some(self.scheduler.schedule_repeating(TICK_INTERVAL, id));
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick.take() {
            debug!("Cancelling tick {}", handle.id());
            handle.cancel();
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Last computed remaining duration in milliseconds.
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn target_ms(&self) -> Option<i64> {
        self.target_ms
    }

    pub fn paused_remainder_ms(&self) -> Option<u64> {
        self.paused_remainder_ms
    }

    /// Id of the outstanding recurring tick.
    pub fn current_tick(&self) -> Option<TickId> {
        self.tick.as_ref().map(TickHandle::id)
    }

    /// Returns a serializable view of the engine.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            state: self.state,
            remaining_ms: self.remaining_ms,
            target_ms: self.target_ms,
            paused_remainder_ms: self.paused_remainder_ms,
            parts: TimeParts::from_millis(i64::try_from(self.remaining_ms).unwrap_or(i64::MAX)),
            pause_control: self.state.pause_control(),
        }
    }
}

impl std::fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("state", &self.state)
            .field("target_ms", &self.target_ms)
            .field("remaining_ms", &self.remaining_ms)
            .field("paused_remainder_ms", &self.paused_remainder_ms)
            .field("tick", &self.current_tick())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
