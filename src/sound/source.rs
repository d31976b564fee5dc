//! Sound source management.
//!
//! The alarm is either a user-supplied audio file or the tone generated at
//! runtime. File sources fall back to the tone when they cannot be played.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// Display name of the sound (the file stem).
        name: String,
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// The built-in generated alarm tone.
    Tone {
        /// The name of the tone (e.g., "alarm").
        name: String,
    },
}

impl SoundSource {
    /// Creates a file sound source without checking the path.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates a file sound source after checking that the path names an
    /// existing file with a supported extension.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::UnsupportedFormat` for an unknown extension and
    /// `SoundError::FileNotFound` if the file does not exist.
    ///
    /// # Example
    ///
    /// ```rust
    /// use countdown::sound::SoundSource;
    ///
    /// let source = SoundSource::file_validated("/nonexistent/alarm.wav");
    /// assert!(source.is_err());
    ///
    /// let source = SoundSource::file_validated("/etc/passwd");
    /// assert!(source.is_err());
    /// ```
    pub fn file_validated(path: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let path = path.into();
        validate_sound_path(&path)?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::File { name, path })
    }

    /// Creates a generated tone source.
    #[must_use]
    pub fn tone(name: impl Into<String>) -> Self {
        Self::Tone { name: name.into() }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Tone { name } => name,
        }
    }

    /// Returns true if this is a file sound.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns true if this is the generated tone.
    #[must_use]
    pub fn is_tone(&self) -> bool {
        matches!(self, Self::Tone { .. })
    }

    /// Returns the file path if this is a file sound.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Tone { .. } => None,
        }
    }
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::tone(DEFAULT_TONE_NAME)
    }
}

/// Name of the built-in alarm tone.
pub const DEFAULT_TONE_NAME: &str = "alarm";

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["aiff", "wav", "mp3", "m4a", "flac", "ogg"];

fn validate_sound_path(path: &Path) -> Result<(), SoundError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(SoundError::UnsupportedFormat(path.display().to_string()));
    }

    if !path.is_file() {
        return Err(SoundError::FileNotFound(path.display().to_string()));
    }

    Ok(())
}
