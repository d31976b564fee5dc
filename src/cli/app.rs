//! Interactive countdown session.
//!
//! The session owns the engine and is its only driver. One `select!` loop
//! feeds it scheduler ticks and stdin commands, one event at a time.

use std::io::{Stdout, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::alerts::TerminalAlerts;
use super::display::{Display, TerminalDisplay};
use super::input::DateTimeInput;
use crate::clock::{Clock, SystemClock};
use crate::engine::CountdownEngine;
use crate::scheduler::{TickId, TokioScheduler};
use crate::sound::{AlarmSound, ALARM_TONE_DURATION};
use crate::types::{TimerState, FLASH_DURATION};

// ============================================================================
// Session commands
// ============================================================================

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start, optionally replacing the input text first.
    Start(Option<String>),
    Pause,
    Resume,
    Toggle,
    Reset,
    Status,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl Command {
    /// Parses a command line. Keywords are case-insensitive.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "start" | "s" => {
                if rest.is_empty() {
                    Self::Start(None)
                } else {
                    Self::Start(Some(rest.to_string()))
                }
            }
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "p" | "toggle" => Self::Toggle,
            "reset" | "r" => Self::Reset,
            "status" => Self::Status,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Unknown(word.to_string()),
        }
    }
}

/// Whether the session continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// ============================================================================
// App
// ============================================================================

/// A countdown session bound to the terminal.
pub struct App<W: Write + Send + 'static = Stdout> {
    engine: CountdownEngine,
    input: Arc<DateTimeInput>,
    display: Arc<TerminalDisplay<W>>,
    ticks: mpsc::UnboundedReceiver<TickId>,
}

impl App<Stdout> {
    /// Creates a session on standard output and the system clock.
    #[must_use]
    pub fn new(alarm: AlarmSound) -> Self {
        Self::with_output(std::io::stdout(), alarm)
    }
}

impl<W: Write + Send + 'static> App<W> {
    /// Creates a session that renders to `out`.
    #[must_use]
    pub fn with_output(out: W, alarm: AlarmSound) -> Self {
        Self::with_clock(Arc::new(SystemClock), out, alarm)
    }

    /// Creates a session with an explicit clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>, out: W, alarm: AlarmSound) -> Self {
        let (scheduler, ticks) = TokioScheduler::new();
        let input = Arc::new(DateTimeInput::new());
        let display = Arc::new(TerminalDisplay::new(out));
        let alerts = Arc::new(TerminalAlerts::new(display.clone(), alarm));

        let engine = CountdownEngine::new(
            clock,
            Arc::new(scheduler),
            input.clone(),
            display.clone(),
            alerts,
        );

        Self {
            engine,
            input,
            display,
            ticks,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    #[must_use]
    pub fn input(&self) -> &DateTimeInput {
        &self.input
    }

    #[must_use]
    pub fn display(&self) -> &TerminalDisplay<W> {
        &self.display
    }

    /// Applies one command to the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the status snapshot cannot be written.
    pub fn handle_command(&mut self, command: Command) -> Result<Flow> {
        debug!("Command: {:?}", command);

        match command {
            Command::Start(text) => {
                if let Some(text) = text {
                    self.input.set(text);
                }
                if let Err(e) = self.engine.start() {
                    Display::show_rejection(&e);
                }
            }
            Command::Pause => self.engine.pause(),
            Command::Resume => self.engine.resume(),
            Command::Toggle => self.engine.toggle_pause_resume(),
            Command::Reset => self.engine.reset(),
            Command::Status => {
                let status = Display::format_status(&self.engine.snapshot())?;
                self.display.print_block(&status);
            }
            Command::Help => self.display.print_block(Display::help_text()),
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(word) => Display::show_unknown(&word),
            Command::Empty => {}
        }

        Ok(Flow::Continue)
    }

    /// Runs the session until the user quits, Ctrl-C is pressed, or
    /// `commands` ends while no countdown is running.
    ///
    /// A paused countdown cannot be resumed once `commands` has ended, so
    /// the session ends with it.
    ///
    /// `initial_at` is entered into the input and started before any
    /// command is read.
    ///
    /// # Errors
    ///
    /// Returns an error if reading commands fails.
    pub async fn run<R>(&mut self, commands: R, initial_at: Option<String>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        if let Some(at) = initial_at {
            self.handle_command(Command::Start(Some(at)))?;
        }

        let mut lines = commands.lines();
        let mut input_open = true;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            if !input_open && self.engine.state() != TimerState::Running {
                break;
            }

            tokio::select! {
                Some(id) = self.ticks.recv() => {
                    self.engine.tick(id);
                }
                line = lines.next_line(), if input_open => {
                    match line.context("Failed to read command")? {
                        Some(line) => {
                            if self.handle_command(Command::parse(&line))? == Flow::Quit {
                                break;
                            }
                        }
                        None => {
                            debug!("Command input closed");
                            input_open = false;
                        }
                    }
                }
                _ = &mut ctrl_c => {
                    info!("Interrupted");
                    break;
                }
            }
        }

        if !input_open && self.engine.state() == TimerState::Finished {
            // Let the flash and the alarm play out before leaving
            tokio::time::sleep(FLASH_DURATION.max(ALARM_TONE_DURATION)).await;
        }

        self.engine.dispose();
        self.display.finish();
        Ok(())
    }
}

impl<W: Write + Send + 'static> std::fmt::Debug for App<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("engine", &self.engine)
            .field("input", &self.input.value())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sound::{MockSoundPlayer, SoundSource};
    use chrono::{Local, SecondsFormat};

    fn future_rfc3339(ms: i64) -> String {
        (Local::now() + chrono::Duration::milliseconds(ms))
            .to_rfc3339_opts(SecondsFormat::Millis, false)
    }

    fn output(app: &App<Vec<u8>>) -> String {
        app.display()
            .with_output(|out| String::from_utf8_lossy(out).into_owned())
    }

    mod command_parse_tests {
        use super::*;

        #[test]
        fn test_parse_keywords() {
            assert_eq!(Command::parse("start"), Command::Start(None));
            assert_eq!(Command::parse("s"), Command::Start(None));
            assert_eq!(Command::parse("pause"), Command::Pause);
            assert_eq!(Command::parse("resume"), Command::Resume);
            assert_eq!(Command::parse("p"), Command::Toggle);
            assert_eq!(Command::parse("reset"), Command::Reset);
            assert_eq!(Command::parse("r"), Command::Reset);
            assert_eq!(Command::parse("status"), Command::Status);
            assert_eq!(Command::parse("help"), Command::Help);
            assert_eq!(Command::parse("q"), Command::Quit);
        }

        #[test]
        fn test_parse_start_with_datetime() {
            assert_eq!(
                Command::parse("start 2030-01-31 18:30"),
                Command::Start(Some("2030-01-31 18:30".to_string()))
            );
            assert_eq!(
                Command::parse("  S   2030-01-31T18:30  "),
                Command::Start(Some("2030-01-31T18:30".to_string()))
            );
        }

        #[test]
        fn test_parse_is_case_insensitive() {
            assert_eq!(Command::parse("PAUSE"), Command::Pause);
            assert_eq!(Command::parse("Quit"), Command::Quit);
        }

        #[test]
        fn test_parse_empty_and_unknown() {
            assert_eq!(Command::parse(""), Command::Empty);
            assert_eq!(Command::parse("   "), Command::Empty);
            assert_eq!(
                Command::parse("launch now"),
                Command::Unknown("launch".to_string())
            );
        }
    }

    mod handle_command_tests {
        use super::*;

        fn app() -> App<Vec<u8>> {
            App::with_output(Vec::new(), AlarmSound::silent())
        }

        #[tokio::test]
        async fn test_start_without_input_is_rejected() {
            let mut app = app();

            let flow = app.handle_command(Command::Start(None)).unwrap();

            assert_eq!(flow, Flow::Continue);
            assert_eq!(app.engine().state(), TimerState::Idle);
        }

        #[tokio::test]
        async fn test_start_with_datetime_runs() {
            let mut app = app();

            app.handle_command(Command::Start(Some(future_rfc3339(60_000))))
                .unwrap();

            assert_eq!(app.engine().state(), TimerState::Running);
            assert!(output(&app).contains("[Pause]"));
        }

        #[tokio::test]
        async fn test_toggle_and_reset() {
            let mut app = app();
            app.handle_command(Command::Start(Some(future_rfc3339(60_000))))
                .unwrap();

            app.handle_command(Command::Toggle).unwrap();
            assert_eq!(app.engine().state(), TimerState::Paused);
            assert!(output(&app).ends_with("[Resume]"));

            app.handle_command(Command::Toggle).unwrap();
            assert_eq!(app.engine().state(), TimerState::Running);

            app.handle_command(Command::Reset).unwrap();
            assert_eq!(app.engine().state(), TimerState::Idle);
            assert_eq!(app.input().value(), "");
            assert!(output(&app).ends_with("00d 00h 00m 00s"));
        }

        #[tokio::test]
        async fn test_quit_and_informational_commands() {
            let mut app = app();

            assert_eq!(app.handle_command(Command::Status).unwrap(), Flow::Continue);
            assert_eq!(app.handle_command(Command::Help).unwrap(), Flow::Continue);
            assert_eq!(
                app.handle_command(Command::Unknown("x".into())).unwrap(),
                Flow::Continue
            );
            assert_eq!(app.handle_command(Command::Quit).unwrap(), Flow::Quit);
        }
    }

    mod run_tests {
        use super::*;
        use std::time::Duration;

        #[tokio::test]
        async fn test_run_ends_when_input_closes_while_idle() {
            let mut app = App::with_output(Vec::new(), AlarmSound::silent());

            tokio::time::timeout(Duration::from_secs(5), app.run(&b"help\n"[..], None))
                .await
                .expect("session should end")
                .unwrap();

            assert_eq!(app.engine().state(), TimerState::Idle);
        }

        #[tokio::test]
        async fn test_run_quits_on_command() {
            let mut app = App::with_output(Vec::new(), AlarmSound::silent());
            let at = future_rfc3339(3_600_000);

            tokio::time::timeout(
                Duration::from_secs(5),
                app.run(&b"pause\nquit\nstart\n"[..], Some(at)),
            )
            .await
            .expect("session should end")
            .unwrap();

            assert_eq!(app.engine().state(), TimerState::Paused);
            assert_eq!(app.engine().current_tick(), None);
        }

        #[tokio::test]
        async fn test_run_ends_when_input_closes_while_paused() {
            let mut app = App::with_output(Vec::new(), AlarmSound::silent());
            let at = future_rfc3339(3_600_000);

            tokio::time::timeout(Duration::from_secs(5), app.run(&b"pause\n"[..], Some(at)))
                .await
                .expect("paused session should end with its input")
                .unwrap();

            assert_eq!(app.engine().state(), TimerState::Paused);
            assert_eq!(app.engine().current_tick(), None);
            assert!(output(&app).ends_with("[Resume]\n"));
        }

        #[tokio::test]
        async fn test_run_writes_status_and_help_to_output() {
            let mut app = App::with_output(Vec::new(), AlarmSound::silent());

            tokio::time::timeout(
                Duration::from_secs(5),
                app.run(&b"status\nhelp\n"[..], None),
            )
            .await
            .expect("session should end")
            .unwrap();

            let out = output(&app);
            assert!(out.contains("\"state\":\"idle\""));
            assert!(out.contains("Commands:"));
            assert!(out.ends_with('\n'));
        }

        #[tokio::test]
        async fn test_run_counts_down_to_finish() {
            let mock = Arc::new(MockSoundPlayer::new());
            let alarm = AlarmSound::new(mock.clone(), SoundSource::default());
            let mut app = App::with_output(Vec::new(), alarm);
            let at = future_rfc3339(600);

            tokio::time::timeout(Duration::from_secs(10), app.run(&b""[..], Some(at)))
                .await
                .expect("session should end")
                .unwrap();

            assert_eq!(app.engine().state(), TimerState::Finished);
            assert_eq!(mock.play_count(), 1);
            assert!(output(&app).contains("Time's up!"));
            assert!(output(&app).ends_with("00d 00h 00m 00s"));
        }

        #[tokio::test]
        async fn test_run_rejects_past_initial_target() {
            let clock = Arc::new(ManualClock::new(Local::now().timestamp_millis()));
            let mut app = App::with_clock(clock, Vec::new(), AlarmSound::silent());
            let at = future_rfc3339(-5_000);

            tokio::time::timeout(Duration::from_secs(5), app.run(&b""[..], Some(at)))
                .await
                .expect("session should end")
                .unwrap();

            assert_eq!(app.engine().state(), TimerState::Idle);
            assert!(!output(&app).contains("Time's up!"));
        }
    }
}
