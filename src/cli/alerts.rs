//! Finish alerts for the terminal front end.

use std::io::{Stdout, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::display::TerminalDisplay;
use crate::engine::AlertSink;
use crate::sound::AlarmSound;

/// Flashes the terminal display and plays the alarm.
#[derive(Debug)]
pub struct TerminalAlerts<W: Write + Send + 'static = Stdout> {
    display: Arc<TerminalDisplay<W>>,
    alarm: AlarmSound,
    /// Bumped for every flash so only the latest one clears the highlight.
    flash_generation: Arc<AtomicU64>,
}

impl<W: Write + Send + 'static> TerminalAlerts<W> {
    #[must_use]
    pub fn new(display: Arc<TerminalDisplay<W>>, alarm: AlarmSound) -> Self {
        Self {
            display,
            alarm,
            flash_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn alarm(&self) -> &AlarmSound {
        &self.alarm
    }
}

fn clear_highlight<W: Write + Send>(
    display: &TerminalDisplay<W>,
    generation: &AtomicU64,
    expected: u64,
) {
    if generation.load(Ordering::SeqCst) == expected {
        display.set_highlight(false);
        debug!("Flash cleared");
    }
}

impl<W: Write + Send + 'static> AlertSink for TerminalAlerts<W> {
    fn flash(&self, duration: Duration) {
        let generation = self.flash_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.display.set_highlight(true);

        let display = Arc::clone(&self.display);
        let flash_generation = Arc::clone(&self.flash_generation);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    clear_highlight(&display, &flash_generation, generation);
                });
            }
            Err(_) => {
                std::thread::spawn(move || {
                    std::thread::sleep(duration);
                    clear_highlight(&display, &flash_generation, generation);
                });
            }
        }
    }

    fn play_sound(&self) {
        self.alarm.play();
    }

    fn stop_sound(&self) {
        self.alarm.stop();
    }
}
