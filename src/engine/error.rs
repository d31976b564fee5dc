//! Countdown engine error types.
//!
//! Both errors reject a `start` command without touching engine state; the
//! user can correct the input and try again.

use thiserror::Error;

/// Reasons a `start` command is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CountdownError {
    /// No date/time selected, or the selection could not be read.
    #[error("Please select a valid date and time!")]
    MissingInput,

    /// The selected instant is not in the future.
    #[error("Please choose a future time!")]
    PastTarget,
}

impl CountdownError {
    /// Returns a short hint for correcting the input.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::MissingInput => "Enter a date and time such as 2030-01-31T18:30",
            Self::PastTarget => "Pick a moment later than the current time",
        }
    }
}
