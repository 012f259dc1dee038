// ABOUTME: Immutable change records emitted when a tweak's display value changes
// ABOUTME: Defines event sources and the console line format for events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which actor made a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    /// Application code
    Code,
    /// An in-process user interface
    Ui,
    /// A remote console client
    Web,
}

impl EventSource {
    /// Lowercase label used in event lines
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Ui => "ui",
            Self::Web => "web",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed change of a tweak's display value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweakEvent {
    /// Key of the changed tweak
    pub key: String,
    /// Display value before the change
    pub old_value: String,
    /// Display value after the change
    pub new_value: String,
    /// When the change was recorded
    pub timestamp: DateTime<Utc>,
    /// Who made the change
    pub source: EventSource,
}

impl TweakEvent {
    /// Create an event stamped with the current time
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
        source: EventSource,
    ) -> Self {
        Self {
            key: key.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
            timestamp: Utc::now(),
            source,
        }
    }

    /// Replace the timestamp
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Console line: `[<timestamp>] <key>: <old> -> <new> (<source>)`
    #[must_use]
    pub fn format_line(&self) -> String {
        format!(
            "[{}] {}: {} -> {} ({})",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.key,
            self.old_value,
            self.new_value,
            self.source
        )
    }
}

impl fmt::Display for TweakEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_line_uses_fractional_utc_timestamp() {
        let timestamp = Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
            .single()
            .unwrap()
            + Duration::milliseconds(589);
        let event = TweakEvent::new("physics.speed", "1.0", "2.5", EventSource::Web)
            .with_timestamp(timestamp);

        assert_eq!(
            event.format_line(),
            "[2025-03-14T09:26:53.589Z] physics.speed: 1.0 -> 2.5 (web)"
        );
    }

    #[test]
    fn test_source_serializes_lowercase() {
        let json = serde_json::to_string(&EventSource::Code).unwrap();
        assert_eq!(json, "\"code\"");
    }
}
