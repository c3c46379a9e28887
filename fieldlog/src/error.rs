// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while constructing loggers, sinks, and settings.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown level name: {0}")]
    UnknownLevel(String),
    #[error("level number out of range, must be in 0..=7: {0}")]
    LevelOutOfRange(u64),
    #[error("invalid time format description `{format}`: {reason}")]
    InvalidTimeFormat { format: String, reason: String },
    #[error("file capacity must be greater than zero")]
    InvalidCapacity,
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
