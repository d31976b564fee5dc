//! Sound system error types.
//!
//! None of these reach the countdown engine: the alarm wrapper logs them and
//! carries on, since a silent alarm does not affect timing.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the specified path.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// Sound file has an extension we do not decode.
    #[error("unsupported sound file format: {0}")]
    UnsupportedFormat(String),

    /// Failed to decode the audio file.
    #[error("failed to decode sound file: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Generic sound playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to the audio file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::UnsupportedFormat(_) | Self::DecodeError(_)
        )
    }

    /// Returns true if playback should fall back to the generated tone.
    #[must_use]
    pub fn should_fallback_to_tone(&self) -> bool {
        self.is_file_error()
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "Connect an audio output device",
            Self::FileNotFound(_) => "Check the --sound path; the built-in tone is used instead",
            Self::UnsupportedFormat(_) => "Use a wav, mp3, flac, ogg, m4a or aiff file",
            Self::DecodeError(_) => "The sound file may be corrupted",
            Self::StreamError(_) => "Check the system audio settings",
            Self::PlaybackError(_) => "Run with --no-sound to silence the alarm",
        }
    }
}
