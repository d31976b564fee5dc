//! Built-in alarm tone.
//!
//! Generated at runtime instead of shipping an audio asset.

use std::time::Duration;

use rodio::source::SineWave;
use rodio::Source;

/// Pitch of the alarm tone.
pub const ALARM_FREQUENCY_HZ: f32 = 880.0;

/// Length of one alarm playback.
pub const ALARM_TONE_DURATION: Duration = Duration::from_millis(1_500);

const ALARM_VOLUME: f32 = 0.25;

/// Returns a fresh alarm tone, positioned at its start.
#[must_use]
pub fn alarm_tone() -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(ALARM_FREQUENCY_HZ)
        .take_duration(ALARM_TONE_DURATION)
        .amplify(ALARM_VOLUME)
}
