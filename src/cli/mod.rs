//! CLI module for the countdown timer.
//!
//! This module provides the terminal front end:
//! - `commands`: Command definitions using clap derive
//! - `input`: Date/time text input and parsing
//! - `display`: Countdown line rendering and one-off output
//! - `alerts`: Flash and alarm on finish
//! - `app`: The interactive session loop

pub mod alerts;
pub mod app;
pub mod commands;
pub mod display;
pub mod input;

pub use alerts::TerminalAlerts;
pub use app::{App, Command, Flow};
pub use commands::{Cli, Commands, RunArgs};
pub use display::{Display, TerminalDisplay};
pub use input::{parse_target_millis, DateTimeInput};
