//! Countdown engine and the interfaces it drives.

pub mod countdown;
pub mod error;
pub mod ports;

pub use countdown::CountdownEngine;
pub use error::CountdownError;
pub use ports::{
    AlertSink, DisplaySink, FixedInput, RecordingAlerts, RecordingDisplay, TargetInput,
};
