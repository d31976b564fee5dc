//! Date/time input for the terminal front end.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use tracing::debug;

use crate::engine::TargetInput;

/// Accepted local date/time layouts, tried in order.
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a target date/time into epoch milliseconds.
///
/// Text with an explicit offset (RFC 3339) is taken as is; anything else is
/// read as local time. Returns `None` for empty or unreadable text and for
/// local times that do not exist (e.g. inside a DST gap).
pub fn parse_target_millis(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.timestamp_millis());
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|datetime| datetime.timestamp_millis())
}

/// The text field holding the user's target date/time.
#[derive(Debug, Default)]
pub struct DateTimeInput {
    value: Mutex<String>,
}

impl DateTimeInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.value.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replaces the field's text.
    pub fn set(&self, text: impl Into<String>) {
        *self.lock() = text.into();
    }

    /// Returns the field's text.
    #[must_use]
    pub fn value(&self) -> String {
        self.lock().clone()
    }
}

impl TargetInput for DateTimeInput {
    fn target_millis(&self) -> Option<i64> {
        let value = self.value();
        let parsed = parse_target_millis(&value);
        if parsed.is_none() && !value.is_empty() {
            debug!("Could not read '{}' as a date and time", value);
        }
        parsed
    }

    fn clear(&self) {
        self.lock().clear();
    }
}
