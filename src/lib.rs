//! Countdown Timer Library
//!
//! This library provides the core functionality for the countdown CLI.
//! It includes:
//! - Countdown engine with its state machine and time arithmetic
//! - Clock and tick scheduler abstractions, with deterministic fakes
//! - Sound playback for the finish alarm
//! - CLI command parsing, terminal display and the interactive session
//! - Shared type definitions for state and display values

pub mod cli;
pub mod clock;
pub mod engine;
pub mod scheduler;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{AlertSink, CountdownEngine, CountdownError, DisplaySink, TargetInput};
pub use scheduler::{ManualScheduler, Scheduler, TickHandle, TickId, TokioScheduler};
pub use sound::{AlarmSound, SoundError, SoundPlayer, SoundSource};
pub use types::{
    EngineSnapshot, PauseControl, PauseLabel, TimeParts, TimerState, FLASH_DURATION,
    TICK_INTERVAL, TIMES_UP_MESSAGE,
};
