//! Command definitions for the countdown CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI Structure
// ============================================================================

/// Countdown timer to a chosen date and time
#[derive(Parser, Debug)]
#[command(
    name = "countdown",
    version,
    about = "Count down to a date and time in the terminal",
    long_about = "Counts down to a chosen local date and time, showing days, hours, \
                  minutes and seconds.\nWhen the moment arrives the display flashes \
                  and an alarm sounds.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive countdown session
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Start immediately, counting down to DATETIME
    /// (e.g. 2030-01-31T18:30, "2030-01-31 18:30:00", 2030-01-31T18:30:00+02:00)
    #[arg(short, long, value_name = "DATETIME")]
    pub at: Option<String>,

    /// Disable the alarm sound
    #[arg(long)]
    pub no_sound: bool,

    /// Play this audio file instead of the built-in alarm tone
    #[arg(long, value_name = "PATH", conflicts_with = "no_sound")]
    pub sound: Option<PathBuf>,
}

// ============================================================================
// Tests
// ============================================================================
