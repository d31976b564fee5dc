//! Core data types for the countdown timer.
//!
//! This module defines the data structures used for:
//! - Timer state and the pause control derived from it
//! - Decomposition of a remaining duration into days/hours/minutes/seconds
//! - Serializable snapshots of the engine for status output

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cadence of the recurring recomputation tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// How long the finish highlight stays on the display cells.
pub const FLASH_DURATION: Duration = Duration::from_secs(1);

/// Message shown once the countdown reaches its target.
pub const TIMES_UP_MESSAGE: &str = "⏰ Time's up!";

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// No countdown configured
    #[default]
    Idle,
    /// Counting down toward the target instant
    Running,
    /// Countdown suspended, remainder captured
    Paused,
    /// Target instant reached; terminal until reset or a new start
    Finished,
}

impl TimerState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Finished => "finished",
        }
    }

    /// Derives the pause/resume control from the state.
    pub fn pause_control(&self) -> PauseControl {
        match self {
            TimerState::Running => PauseControl {
                enabled: true,
                label: PauseLabel::Pause,
            },
            TimerState::Paused => PauseControl {
                enabled: true,
                label: PauseLabel::Resume,
            },
            TimerState::Idle | TimerState::Finished => PauseControl::disabled(),
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PauseControl
// ============================================================================

/// Label of the combined pause/resume control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseLabel {
    Pause,
    Resume,
}

impl PauseLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PauseLabel::Pause => "Pause",
            PauseLabel::Resume => "Resume",
        }
    }
}

/// Presentation of the pause/resume control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseControl {
    /// Whether the control accepts input
    pub enabled: bool,
    /// Text shown on the control
    pub label: PauseLabel,
}

impl PauseControl {
    /// The control as shown on load, after reset and after finishing.
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            label: PauseLabel::Pause,
        }
    }
}

// ============================================================================
// TimeParts
// ============================================================================

/// A remaining duration broken down for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeParts {
    /// All-zero display.
    pub const ZERO: TimeParts = TimeParts {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decomposes milliseconds into days/hours/minutes/seconds.
    ///
    /// Negative input is clamped to zero.
    pub fn from_millis(ms: i64) -> Self {
        let ms = clamp_millis(ms);
        Self {
            days: ms / MS_PER_DAY,
            hours: (ms / MS_PER_HOUR) % 24,
            minutes: (ms / MS_PER_MINUTE) % 60,
            seconds: (ms / MS_PER_SECOND) % 60,
        }
    }

    /// Returns the parts in display order.
    pub fn as_array(&self) -> [u64; 4] {
        [self.days, self.hours, self.minutes, self.seconds]
    }
}

impl fmt::Display for TimeParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Clamps a raw millisecond difference to a non-negative duration.
pub fn clamp_millis(ms: i64) -> u64 {
    u64::try_from(ms).unwrap_or(0)
}

// ============================================================================
// EngineSnapshot
// ============================================================================

/// Serializable view of the engine, used for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Current state
    pub state: TimerState,
    /// Last computed remaining duration in milliseconds
    #[serde(rename = "remainingMs")]
    pub remaining_ms: u64,
    /// Target instant in epoch milliseconds (running only)
    #[serde(rename = "targetMs", skip_serializing_if = "Option::is_none")]
    pub target_ms: Option<i64>,
    /// Remainder captured at pause (paused only)
    #[serde(rename = "pausedRemainderMs", skip_serializing_if = "Option::is_none")]
    pub paused_remainder_ms: Option<u64>,
    /// Decomposed remaining duration
    pub parts: TimeParts,
    /// Derived pause/resume control
    #[serde(rename = "pauseControl")]
    pub pause_control: PauseControl,
}

// ============================================================================
// Tests
// ============================================================================
