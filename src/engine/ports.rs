//! Collaborator interfaces consumed by the countdown engine.
//!
//! The engine never touches presentation or audio directly. It talks to:
//! - a [`TargetInput`] that yields the selected instant,
//! - a [`DisplaySink`] that renders the time cells, message and pause control,
//! - an [`AlertSink`] that flashes the display and plays the alarm.
//!
//! Recording implementations are provided for headless testing.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::types::{PauseControl, TimeParts};

/// Source of the user-selected target instant.
pub trait TargetInput {
    /// Returns the selected instant in epoch milliseconds, or `None` if
    /// nothing usable is selected.
    fn target_millis(&self) -> Option<i64>;

    /// Clears the selection.
    fn clear(&self);
}

/// Presentation of the countdown.
pub trait DisplaySink {
    /// Renders the four time cells.
    fn show_time(&self, parts: TimeParts);

    /// Shows a status message; an empty string clears it.
    fn show_message(&self, message: &str);

    /// Updates the pause/resume control.
    fn show_pause_control(&self, control: PauseControl);
}

/// Side effects fired when the countdown finishes.
pub trait AlertSink {
    /// Highlights every display cell for `duration`, then clears it.
    fn flash(&self, duration: Duration);

    /// Rewinds and plays the alarm sound. Failures are not reported.
    fn play_sound(&self);

    /// Stops the alarm sound and rewinds it.
    fn stop_sound(&self);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ============================================================================
// Test doubles
// ============================================================================

/// Input holding a fixed instant.
#[derive(Debug, Default)]
pub struct FixedInput {
    value: AtomicI64,
    present: AtomicBool,
    clear_calls: AtomicUsize,
}

impl FixedInput {
    /// An input with nothing selected.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// An input with `millis` selected.
    #[must_use]
    pub fn at(millis: i64) -> Self {
        let input = Self::default();
        input.set(millis);
        input
    }

    pub fn set(&self, millis: i64) {
        self.value.store(millis, Ordering::SeqCst);
        self.present.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.present.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

impl TargetInput for FixedInput {
    fn target_millis(&self) -> Option<i64> {
        self.present
            .load(Ordering::SeqCst)
            .then(|| self.value.load(Ordering::SeqCst))
    }

    fn clear(&self) {
        self.present.store(false, Ordering::SeqCst);
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Display that records everything pushed to it.
#[derive(Debug)]
pub struct RecordingDisplay {
    frames: Mutex<Vec<TimeParts>>,
    messages: Mutex<Vec<String>>,
    control: Mutex<PauseControl>,
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self {
            frames: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            control: Mutex::new(PauseControl::disabled()),
        }
    }
}

impl RecordingDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every rendered frame, oldest first.
    #[must_use]
    pub fn frames(&self) -> Vec<TimeParts> {
        lock(&self.frames).clone()
    }

    /// The most recently rendered frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<TimeParts> {
        lock(&self.frames).last().copied()
    }

    /// The message currently shown (empty if cleared or never set).
    #[must_use]
    pub fn message(&self) -> String {
        lock(&self.messages).last().cloned().unwrap_or_default()
    }

    /// Every message shown, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    #[must_use]
    pub fn pause_control(&self) -> PauseControl {
        *lock(&self.control)
    }

    pub fn clear_frames(&self) {
        lock(&self.frames).clear();
    }
}

impl DisplaySink for RecordingDisplay {
    fn show_time(&self, parts: TimeParts) {
        lock(&self.frames).push(parts);
    }

    fn show_message(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }

    fn show_pause_control(&self, control: PauseControl) {
        *lock(&self.control) = control;
    }
}

/// Alert sink that counts the commands it receives.
#[derive(Debug, Default)]
pub struct RecordingAlerts {
    flashes: Mutex<Vec<Duration>>,
    plays: AtomicUsize,
    stops: AtomicUsize,
    playing: AtomicBool,
}

impl RecordingAlerts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn flash_count(&self) -> usize {
        lock(&self.flashes).len()
    }

    #[must_use]
    pub fn flashes(&self) -> Vec<Duration> {
        lock(&self.flashes).clone()
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Returns true between a `play_sound` and the next `stop_sound`.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

impl AlertSink for RecordingAlerts {
    fn flash(&self, duration: Duration) {
        lock(&self.flashes).push(duration);
    }

    fn play_sound(&self) {
        self.plays.fetch_add(1, Ordering::SeqCst);
        self.playing.store(true, Ordering::SeqCst);
    }

    fn stop_sound(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.playing.store(false, Ordering::SeqCst);
    }
}
