//! Sound playback for the countdown alarm.
//!
//! This module provides audio alert capabilities, including:
//!
//! - A generated alarm tone and optional user sound files
//! - Non-blocking playback that can be stopped and rewound
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │    AlarmSound    │ ← swallows and logs failures
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundPlayer    │────▶│   Sound file     │
//! │                  │     ├──────────────────┤
//! │                  │────▶│  Generated tone  │
//! └──────────────────┘     │    (fallback)    │
//!                          └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use countdown::sound::{RodioSoundPlayer, SoundPlayer, SoundSource};
//!
//! // Create a player (may fail if no audio device)
//! let player = RodioSoundPlayer::new().expect("audio init");
//!
//! player.play(&SoundSource::default()).expect("playback failed");
//! player.stop();
//! ```

mod error;
mod player;
mod source;
mod tone;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{SoundSource, DEFAULT_TONE_NAME};
pub use tone::{alarm_tone, ALARM_FREQUENCY_HZ, ALARM_TONE_DURATION};

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., rodio-based, mock for testing).
pub trait SoundPlayer {
    /// Plays a sound from its beginning, replacing any sound in progress.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Stops playback and rewinds.
    fn stop(&self);
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }

    fn stop(&self) {
        RodioSoundPlayer::stop(self)
    }
}

/// Mock sound player for testing.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    stop_calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            stop_calls: AtomicUsize::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) {
        self.play_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.stop_calls.store(0, Ordering::SeqCst);
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(source.clone());
        Ok(())
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// AlarmSound
// ============================================================================

/// The countdown alarm: one sound source bound to an optional player.
///
/// Playback failures are logged and swallowed. Without a player (no audio
/// device, or sound turned off) every call is a no-op.
#[derive(Clone)]
pub struct AlarmSound {
    player: Option<Arc<dyn SoundPlayer>>,
    source: SoundSource,
}

impl AlarmSound {
    #[must_use]
    pub fn new(player: Arc<dyn SoundPlayer>, source: SoundSource) -> Self {
        Self {
            player: Some(player),
            source,
        }
    }

    /// An alarm that never makes a sound.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            player: None,
            source: SoundSource::default(),
        }
    }

    /// Builds the alarm for the terminal front end.
    ///
    /// `sound` selects a file instead of the built-in tone; an unusable file
    /// is reported and replaced by the tone. `muted` skips audio setup.
    #[must_use]
    pub fn from_settings(muted: bool, sound: Option<&std::path::Path>) -> Self {
        if muted {
            debug!("Alarm sound muted");
            return Self::silent();
        }

        let source = match sound {
            Some(path) => SoundSource::file_validated(path).unwrap_or_else(|e| {
                warn!("{} ({})", e, e.suggestion());
                SoundSource::default()
            }),
            None => SoundSource::default(),
        };

        match try_create_player() {
            Some(player) => Self::new(player, source),
            None => Self::silent(),
        }
    }

    /// Returns true if no player is attached.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.player.is_none()
    }

    #[must_use]
    pub fn source(&self) -> &SoundSource {
        &self.source
    }

    /// Plays the alarm from the start.
    pub fn play(&self) {
        let Some(player) = &self.player else {
            return;
        };
        if let Err(e) = player.play(&self.source) {
            warn!("Alarm sound failed: {}", e);
        }
    }

    /// Stops the alarm and rewinds it.
    pub fn stop(&self) {
        if let Some(player) = &self.player {
            player.stop();
        }
    }
}

impl std::fmt::Debug for AlarmSound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmSound")
            .field("silent", &self.is_silent())
            .field("source", &self.source)
            .finish()
    }
}
