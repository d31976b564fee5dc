//! Integration tests for the countdown engine.
//!
//! These tests drive the engine through its public API:
//! - Deterministic scenarios on a manual clock and scheduler
//! - One wall-clock scenario on the tokio scheduler

use std::sync::Arc;
use std::time::Duration;

use countdown::clock::{Clock, ManualClock, SystemClock};
use countdown::engine::{
    CountdownEngine, CountdownError, FixedInput, RecordingAlerts, RecordingDisplay,
};
use countdown::scheduler::{ManualScheduler, TokioScheduler};
use countdown::types::{TimeParts, TimerState, FLASH_DURATION, TIMES_UP_MESSAGE};

// ============================================================================
// Test Helpers
// ============================================================================

const T0: i64 = 1_800_000_000_000;

struct Session {
    engine: CountdownEngine,
    clock: Arc<ManualClock>,
    scheduler: Arc<ManualScheduler>,
    input: Arc<FixedInput>,
    display: Arc<RecordingDisplay>,
    alerts: Arc<RecordingAlerts>,
}

/// Creates an idle engine wired to manual time and recording sinks.
fn create_session() -> Session {
    let clock = Arc::new(ManualClock::new(T0));
    let scheduler = Arc::new(ManualScheduler::new(clock.clone()));
    let input = Arc::new(FixedInput::empty());
    let display = Arc::new(RecordingDisplay::new());
    let alerts = Arc::new(RecordingAlerts::new());
    let engine = CountdownEngine::new(
        clock.clone(),
        scheduler.clone(),
        input.clone(),
        display.clone(),
        alerts.clone(),
    );
    Session {
        engine,
        clock,
        scheduler,
        input,
        display,
        alerts,
    }
}

impl Session {
    fn select_in(&self, ms: i64) {
        self.input.set(self.clock.now_millis() + ms);
    }

    /// Advances time, delivering every due tick to the engine.
    fn run_for(&mut self, ms: u64) {
        let engine = &mut self.engine;
        self.scheduler
            .advance(Duration::from_millis(ms), |id| engine.tick(id));
    }

    /// Advances time without delivering ticks, as if the host were busy.
    fn sleep(&self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
    }
}

// ============================================================================
// Full countdown
// ============================================================================

#[test]
fn test_countdown_to_finish() {
    let mut s = create_session();
    s.select_in(2_000);

    s.engine.start().unwrap();
    assert_eq!(s.engine.state(), TimerState::Running);
    assert_eq!(s.display.last_frame(), Some(TimeParts::from_millis(2_000)));

    s.run_for(1_000);
    assert_eq!(s.engine.state(), TimerState::Running);
    assert_eq!(s.display.last_frame(), Some(TimeParts::from_millis(1_000)));

    s.run_for(1_000);
    assert_eq!(s.engine.state(), TimerState::Finished);
    assert_eq!(s.display.last_frame(), Some(TimeParts::ZERO));
    assert_eq!(s.display.message(), TIMES_UP_MESSAGE);
    assert!(!s.display.pause_control().enabled);
    assert_eq!(s.alerts.flashes(), vec![FLASH_DURATION]);
    assert_eq!(s.alerts.play_count(), 1);
    assert_eq!(s.scheduler.active_count(), 0);

    // Nothing more happens once finished
    s.run_for(5_000);
    assert_eq!(s.alerts.flash_count(), 1);
    assert_eq!(s.alerts.play_count(), 1);
}

#[test]
fn test_multi_day_countdown_display() {
    let mut s = create_session();
    // 2 days, 3 hours, 4 minutes, 5 seconds
    s.select_in(((2 * 24 + 3) * 60 + 4) * 60_000 + 5_000);

    s.engine.start().unwrap();

    let parts = s.display.last_frame().unwrap();
    assert_eq!(parts.as_array(), [2, 3, 4, 5]);
    assert_eq!(parts.to_string(), "02:03:04:05");

    s.run_for(5_000);
    assert_eq!(s.display.last_frame().unwrap().as_array(), [2, 3, 4, 0]);
}

#[test]
fn test_late_tick_finishes_immediately() {
    let mut s = create_session();
    s.select_in(1_000);
    s.engine.start().unwrap();

    // The host stalls past the target; the next tick finishes
    s.sleep(10_000);
    s.run_for(250);

    assert_eq!(s.engine.state(), TimerState::Finished);
    assert_eq!(s.engine.remaining_ms(), 0);
    assert_eq!(s.alerts.play_count(), 1);
}

// ============================================================================
// Rejected starts
// ============================================================================

#[test]
fn test_rejections_leave_session_untouched() {
    let mut s = create_session();

    assert_eq!(s.engine.start(), Err(CountdownError::MissingInput));
    assert_eq!(
        CountdownError::MissingInput.to_string(),
        "Please select a valid date and time!"
    );

    s.select_in(-5_000);
    assert_eq!(s.engine.start(), Err(CountdownError::PastTarget));
    assert_eq!(
        CountdownError::PastTarget.to_string(),
        "Please choose a future time!"
    );

    s.select_in(0);
    assert_eq!(s.engine.start(), Err(CountdownError::PastTarget));

    assert_eq!(s.engine.state(), TimerState::Idle);
    assert_eq!(s.scheduler.scheduled_count(), 0);
    assert_eq!(s.display.last_frame(), Some(TimeParts::ZERO));
}

#[test]
fn test_rejected_restart_keeps_running_countdown() {
    let mut s = create_session();
    s.select_in(60_000);
    s.engine.start().unwrap();
    s.run_for(1_000);

    s.select_in(-1);
    assert_eq!(s.engine.start(), Err(CountdownError::PastTarget));

    assert_eq!(s.engine.state(), TimerState::Running);
    assert_eq!(s.scheduler.active_count(), 1);
    s.run_for(1_000);
    assert_eq!(s.engine.remaining_ms(), 58_000);
}

// ============================================================================
// Pause and resume
// ============================================================================

#[test]
fn test_pause_wait_resume_keeps_remainder() {
    let mut s = create_session();
    s.select_in(12_000);
    s.engine.start().unwrap();
    s.run_for(2_000);
    assert_eq!(s.engine.remaining_ms(), 10_000);

    s.engine.toggle_pause_resume();
    assert_eq!(s.engine.state(), TimerState::Paused);
    assert_eq!(s.scheduler.active_count(), 0);

    s.run_for(3_000);
    assert_eq!(s.engine.remaining_ms(), 10_000);

    s.engine.toggle_pause_resume();
    assert_eq!(s.engine.state(), TimerState::Running);
    assert_eq!(s.engine.remaining_ms(), 10_000);
    assert_eq!(s.engine.target_ms(), Some(s.clock.now_millis() + 10_000));

    s.run_for(10_000);
    assert_eq!(s.engine.state(), TimerState::Finished);
    // Start + pause + wait + remainder
    assert_eq!(s.clock.now_millis(), T0 + 15_000);
}

#[test]
fn test_repeated_pause_cycles() {
    let mut s = create_session();
    s.select_in(4_000);
    s.engine.start().unwrap();

    for _ in 0..3 {
        s.run_for(1_000);
        s.engine.pause();
        s.run_for(60_000);
        s.engine.resume();
    }

    assert_eq!(s.engine.remaining_ms(), 1_000);
    s.run_for(1_000);
    assert_eq!(s.engine.state(), TimerState::Finished);
}

// ============================================================================
// Reset and restart
// ============================================================================

#[test]
fn test_reset_from_every_state() {
    let prepare: [fn(&mut Session); 4] = [
        |_| {},
        |s| {
            s.select_in(10_000);
            s.engine.start().unwrap();
        },
        |s| {
            s.select_in(10_000);
            s.engine.start().unwrap();
            s.engine.pause();
        },
        |s| {
            s.select_in(500);
            s.engine.start().unwrap();
            s.run_for(500);
        },
    ];

    for setup in prepare {
        let mut s = create_session();
        setup(&mut s);

        s.engine.reset();

        assert_eq!(s.engine.state(), TimerState::Idle);
        assert_eq!(s.display.last_frame(), Some(TimeParts::ZERO));
        assert_eq!(s.display.message(), "");
        assert!(!s.display.pause_control().enabled);
        assert!(s.input.is_empty());
        assert!(!s.alerts.is_playing());
        assert_eq!(s.scheduler.active_count(), 0);
    }
}

#[test]
fn test_rapid_restarts_keep_one_tick() {
    let mut s = create_session();

    for i in 1..=20 {
        s.select_in(i * 1_000);
        s.engine.start().unwrap();
        assert_eq!(s.scheduler.active_count(), 1);
    }

    let fired_before = s.scheduler.fired_count();
    s.run_for(1_000);
    // One schedule at four ticks per second
    assert_eq!(s.scheduler.fired_count() - fired_before, 4);
    assert_eq!(s.engine.remaining_ms(), 19_000);
}

#[test]
fn test_restart_after_finish_silences_alarm() {
    let mut s = create_session();
    s.select_in(250);
    s.engine.start().unwrap();
    s.run_for(250);
    assert!(s.alerts.is_playing());

    s.select_in(5_000);
    s.engine.start().unwrap();

    assert!(!s.alerts.is_playing());
    assert_eq!(s.display.message(), "");
    assert_eq!(s.engine.state(), TimerState::Running);
}

#[test]
fn test_snapshot_serializes_state() {
    let mut s = create_session();
    s.select_in(61_000);
    s.engine.start().unwrap();
    s.engine.pause();

    let json = serde_json::to_value(s.engine.snapshot()).unwrap();

    assert_eq!(json["state"], "paused");
    assert_eq!(json["remainingMs"], 61_000);
    assert_eq!(json["pausedRemainderMs"], 61_000);
    assert_eq!(json["pauseControl"]["label"], "resume");
    assert!(json.get("targetMs").is_none());
}

// ============================================================================
// Wall-clock run
// ============================================================================

#[tokio::test]
async fn test_realtime_pause_resume_and_finish() {
    let clock = Arc::new(SystemClock);
    let (scheduler, mut ticks) = TokioScheduler::new();
    let input = Arc::new(FixedInput::at(clock.now_millis() + 1_000));
    let display = Arc::new(RecordingDisplay::new());
    let alerts = Arc::new(RecordingAlerts::new());
    let mut engine = CountdownEngine::new(
        clock.clone(),
        Arc::new(scheduler),
        input,
        display.clone(),
        alerts.clone(),
    );

    engine.start().unwrap();
    engine.pause();
    tokio::time::sleep(Duration::from_millis(400)).await;
    engine.resume();

    // Roughly the full second is left after the pause
    assert!(engine.remaining_ms() > 900);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while engine.state() != TimerState::Finished {
        let id = tokio::time::timeout_at(deadline, ticks.recv())
            .await
            .expect("countdown should finish")
            .expect("tick channel open");
        engine.tick(id);
    }

    assert_eq!(display.last_frame(), Some(TimeParts::ZERO));
    assert_eq!(alerts.flash_count(), 1);
    assert_eq!(alerts.play_count(), 1);
    assert_eq!(engine.current_tick(), None);
}
