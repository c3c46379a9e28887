// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Error;
use core::fmt::Display;
use core::str::FromStr;

/// Severity of a log record, ordered from least to most severe.
///
/// `Disable` sorts above every real level. Using it as the threshold of a
/// `Logger` turns off all output, and it is never written as a record level.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    Panic = 6,
    Disable = 7,
}

impl Level {
    /// Every level that can be written, in ascending order of severity.
    pub const ALL: [Level; 7] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Panic,
    ];

    /// The name written into the level field of a record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Panic => "PANIC",
            Level::Disable => "DISABLE",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    /// Parses a level name, ignoring ASCII case. `warning` is accepted as an
    /// alias for `warn`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            "panic" => Ok(Level::Panic),
            "disable" => Ok(Level::Disable),
            _ => Err(Error::UnknownLevel(s.to_string())),
        }
    }
}

impl TryFrom<u64> for Level {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Level::Trace),
            1 => Ok(Level::Debug),
            2 => Ok(Level::Info),
            3 => Ok(Level::Warn),
            4 => Ok(Level::Error),
            5 => Ok(Level::Fatal),
            6 => Ok(Level::Panic),
            7 => Ok(Level::Disable),
            _ => Err(Error::LevelOutOfRange(value)),
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Trace,
        }
    }
}

impl From<Level> for log::LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => log::LevelFilter::Trace,
            Level::Debug => log::LevelFilter::Debug,
            Level::Info => log::LevelFilter::Info,
            Level::Warn => log::LevelFilter::Warn,
            Level::Error | Level::Fatal | Level::Panic => log::LevelFilter::Error,
            Level::Disable => log::LevelFilter::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(Level::Panic < Level::Disable);
    }

    #[test]
    fn parse() {
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("Warning".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("disable".parse::<Level>().unwrap(), Level::Disable);
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn numbers() {
        for (i, level) in Level::ALL.iter().enumerate() {
            assert_eq!(Level::try_from(i as u64).unwrap(), *level);
            assert_eq!(level.index(), i);
        }
        assert_eq!(Level::try_from(7).unwrap(), Level::Disable);
        assert!(matches!(
            Level::try_from(8),
            Err(Error::LevelOutOfRange(8))
        ));
    }
}
