//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which uses the rodio v0.20
//! audio library for cross-platform sound playback.

use std::fs::File;
use std::io::BufReader;
use std::sync::{Arc, Mutex, MutexGuard};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;
use super::tone::alarm_tone;

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking. The player keeps the sink of the current sound
/// so it can be stopped; starting a new sound stops the previous one, which
/// makes every `play` start from the beginning.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Sink of the sound currently playing.
    current: Mutex<Option<Sink>>,
}

impl RodioSoundPlayer {
    /// Creates a new sound player on the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            current: Mutex::new(None),
        })
    }

    /// Plays a sound from the start, replacing any sound still playing.
    ///
    /// If a file source cannot be opened or decoded, the built-in tone is
    /// played instead.
    ///
    /// # Errors
    ///
    /// Returns an error if no sink can be created or the tone fallback
    /// fails as well.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        self.stop();

        match source {
            SoundSource::File { path, name } => {
                debug!("Playing sound file: {}", name);
                match self.play_file(path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.should_fallback_to_tone() => {
                        warn!(
                            "Failed to play sound file '{}': {}, falling back to tone",
                            name, e
                        );
                        self.play_source(Box::new(alarm_tone()))
                    }
                    Err(e) => Err(e),
                }
            }
            SoundSource::Tone { name } => {
                debug!("Playing tone: {}", name);
                self.play_source(Box::new(alarm_tone()))
            }
        }
    }

    /// Stops the current sound. The next `play` starts from the beginning.
    pub fn stop(&self) {
        if let Some(sink) = self.lock_current().take() {
            sink.stop();
            debug!("Sound playback stopped");
        }
    }

    /// Returns true while a sound is still playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.lock_current()
            .as_ref()
            .is_some_and(|sink| !sink.empty())
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<Sink>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Plays a sound file from the filesystem.
    fn play_file(&self, path: &std::path::Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let reader = BufReader::new(file);
        let decoder = Decoder::new(reader).map_err(|e| SoundError::DecodeError(e.to_string()))?;

        self.play_source(Box::new(decoder.convert_samples::<f32>()))
    }

    /// Plays a decoded audio source on a fresh sink.
    fn play_source(&self, source: Box<dyn Source<Item = f32> + Send>) -> Result<(), SoundError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        sink.append(source);
        *self.lock_current() = Some(sink);

        debug!("Sound playback started");
        Ok(())
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("playing", &self.is_playing())
            .finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player() -> Option<Arc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
