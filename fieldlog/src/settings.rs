// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Error;
use core::str::FromStr;
use time::format_description::OwnedFormatItem;

/// Field names and the time format used when building records.
///
/// A `Logger` holds its settings behind an `Arc` and hands the same handle to
/// the runtime computes it creates, so loggers with different settings can be
/// used side by side.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Name of the level field. Defaults to `level`.
    pub level: String,
    /// Name of the message field. Defaults to `msg`.
    pub message: String,
    /// Name of the timestamp field. Defaults to `time`.
    pub time: String,
    /// Name of the caller location field. Defaults to `caller`.
    pub caller: String,
    /// Name of the thread id field. Defaults to `cid`.
    pub thread: String,
    /// Name of the field holding the `log` target of bridged records.
    /// Defaults to `target`.
    pub target: String,
    pub time_format: TimeFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "level".to_string(),
            message: "msg".to_string(),
            time: "time".to_string(),
            caller: "caller".to_string(),
            thread: "cid".to_string(),
            target: "target".to_string(),
            time_format: TimeFormat::Rfc3339,
        }
    }
}

/// How timestamps are rendered.
#[derive(Clone, Debug, Default)]
pub enum TimeFormat {
    /// RFC 3339 with millisecond precision in UTC, written as a string.
    #[default]
    Rfc3339,
    /// Whole seconds since the Unix epoch, written as an integer.
    UnixSeconds,
    /// A `time` format description, written as a string.
    Custom(OwnedFormatItem),
}

impl FromStr for TimeFormat {
    type Err = Error;

    /// An empty string selects `UnixSeconds` and `rfc3339` (in any case)
    /// selects `Rfc3339`. Anything else is parsed as a version 2 `time` format
    /// description, for example `[year]-[month]-[day] [hour]:[minute]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(TimeFormat::UnixSeconds);
        }

        if s.eq_ignore_ascii_case("rfc3339") {
            return Ok(TimeFormat::Rfc3339);
        }

        time::format_description::parse_owned::<2>(s)
            .map(TimeFormat::Custom)
            .map_err(|e| Error::InvalidTimeFormat {
                format: s.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.level, "level");
        assert_eq!(settings.message, "msg");
        assert_eq!(settings.time, "time");
        assert!(matches!(settings.time_format, TimeFormat::Rfc3339));
    }

    #[test]
    fn time_formats() {
        assert!(matches!("".parse::<TimeFormat>(), Ok(TimeFormat::UnixSeconds)));
        assert!(matches!("RFC3339".parse::<TimeFormat>(), Ok(TimeFormat::Rfc3339)));
        assert!(matches!(
            "[year]-[month]-[day]".parse::<TimeFormat>(),
            Ok(TimeFormat::Custom(_))
        ));
        assert!(matches!(
            "[yea".parse::<TimeFormat>(),
            Err(Error::InvalidTimeFormat { .. })
        ));
    }
}
