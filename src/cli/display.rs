//! Display utilities for the countdown CLI.
//!
//! This module provides:
//! - `TerminalDisplay`, the display sink that redraws the countdown line
//! - `Display`, formatted one-off output (errors, status, help)

use std::io::{Stdout, Write};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use tracing::debug;

use crate::engine::{CountdownError, DisplaySink};
use crate::types::{EngineSnapshot, PauseControl, TimeParts};

const HIGHLIGHT_ON: &str = "\x1b[7m";
const HIGHLIGHT_OFF: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";
const CURSOR_UP: &str = "\x1b[1A";

const HELP_TEXT: &str = "Commands:
  start [DATETIME]  start counting down (s)
  pause | resume    pause or resume (p toggles)
  reset             clear the countdown and input (r)
  status            print the current state as JSON
  quit              leave (q)";

// ============================================================================
// TerminalDisplay
// ============================================================================

struct Screen<W> {
    out: W,
    parts: TimeParts,
    control: PauseControl,
    highlighted: bool,
    /// True while the last message sits on the line right above the
    /// countdown line, where it can still be erased.
    message_above: bool,
}

/// Display sink that keeps one countdown line redrawn in place.
pub struct TerminalDisplay<W: Write + Send = Stdout> {
    screen: Mutex<Screen<W>>,
}

impl<W: Write + Send> TerminalDisplay<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            screen: Mutex::new(Screen {
                out,
                parts: TimeParts::ZERO,
                control: PauseControl::disabled(),
                highlighted: false,
                message_above: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Screen<W>> {
        self.screen.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Turns the highlight of every time cell on or off.
    pub fn set_highlight(&self, on: bool) {
        let mut screen = self.lock();
        screen.highlighted = on;
        redraw(&mut screen);
    }

    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.lock().highlighted
    }

    /// Prints a block of text above the countdown line.
    pub fn print_block(&self, text: &str) {
        let mut screen = self.lock();
        if let Err(e) = writeln!(screen.out, "\n{}", text) {
            debug!("Failed to write output: {}", e);
        }
        screen.message_above = false;
        redraw(&mut screen);
    }

    /// Moves past the countdown line so later output starts on a fresh line.
    pub fn finish(&self) {
        let mut screen = self.lock();
        let result = writeln!(screen.out).and_then(|()| screen.out.flush());
        if let Err(e) = result {
            debug!("Failed to finish output: {}", e);
        }
    }

    /// Gives read access to the underlying writer.
    pub fn with_output<R>(&self, f: impl FnOnce(&W) -> R) -> R {
        f(&self.lock().out)
    }
}

impl<W: Write + Send> DisplaySink for TerminalDisplay<W> {
    fn show_time(&self, parts: TimeParts) {
        let mut screen = self.lock();
        screen.parts = parts;
        redraw(&mut screen);
    }

    fn show_message(&self, message: &str) {
        let mut screen = self.lock();

        let result = if message.is_empty() {
            if !screen.message_above {
                return;
            }
            screen.message_above = false;
            // Drop the countdown line, then overwrite the message line with it
            write!(screen.out, "{}{}", CLEAR_LINE, CURSOR_UP)
        } else {
            screen.message_above = true;
            writeln!(screen.out, "\n{}", message)
        };

        if let Err(e) = result {
            debug!("Failed to write message: {}", e);
        }
        redraw(&mut screen);
    }

    fn show_pause_control(&self, control: PauseControl) {
        let mut screen = self.lock();
        screen.control = control;
        redraw(&mut screen);
    }
}

impl<W: Write + Send> std::fmt::Debug for TerminalDisplay<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let screen = self.lock();
        f.debug_struct("TerminalDisplay")
            .field("parts", &screen.parts)
            .field("control", &screen.control)
            .field("highlighted", &screen.highlighted)
            .finish_non_exhaustive()
    }
}

fn redraw<W: Write>(screen: &mut Screen<W>) {
    let line = Display::format_line(screen.parts, screen.control, screen.highlighted);
    let result = write!(screen.out, "{}{}", CLEAR_LINE, line).and_then(|()| screen.out.flush());
    if let Err(e) = result {
        debug!("Failed to redraw countdown: {}", e);
    }
}

// ============================================================================
// Display
// ============================================================================

/// One-off CLI output.
pub struct Display;

impl Display {
    /// Formats the countdown line: four zero-padded cells and the pause
    /// control when it is enabled.
    pub fn format_line(parts: TimeParts, control: PauseControl, highlighted: bool) -> String {
        let cells = [
            (parts.days, "d"),
            (parts.hours, "h"),
            (parts.minutes, "m"),
            (parts.seconds, "s"),
        ]
        .iter()
        .map(|(value, unit)| {
            if highlighted {
                format!("{}{:02}{}{}", HIGHLIGHT_ON, value, unit, HIGHLIGHT_OFF)
            } else {
                format!("{:02}{}", value, unit)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

        if control.enabled {
            format!("{}  [{}]", cells, control.label.as_str())
        } else {
            cells
        }
    }

    /// Shows a rejected start.
    pub fn show_rejection(error: &CountdownError) {
        eprintln!("\n{}", error);
        eprintln!("  {}", error.suggestion());
    }

    /// Formats the engine snapshot as one JSON line.
    pub fn format_status(snapshot: &EngineSnapshot) -> Result<String> {
        serde_json::to_string(snapshot).context("Failed to serialize status")
    }

    /// Returns the interactive command summary.
    pub fn help_text() -> &'static str {
        HELP_TEXT
    }

    /// Shows an unrecognised command.
    pub fn show_unknown(command: &str) {
        eprintln!("\nUnknown command '{}'. Type 'help' for the command list.", command);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
