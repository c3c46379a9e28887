// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Level, Logger};
use log::{Log, Metadata, Record, SetLoggerError};
use std::sync::Arc;

/// Routes records from the `log` facade into a `Logger`.
///
/// The `log` target is written under the target field of the logger's
/// `Settings`, and the file and line reported by the `log` macros are handed
/// to runtime computes such as `Caller`.
pub struct LogBridge {
    logger: Arc<Logger>,
}

impl LogBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.logger.enabled(Level::from(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        let writer = self.logger.level(Level::from(record.level()));
        if !writer.is_enabled() {
            return;
        }

        let writer = writer.str(&self.logger.settings().target, record.target());
        let file = record.file().unwrap_or("<unknown>");
        let line = record.line().unwrap_or(0);

        let _ = match record.args().as_str() {
            Some(message) => writer.finish(message, file, line),
            None => writer.finish(&record.args().to_string(), file, line),
        };
    }

    fn flush(&self) {
        let _ = self.logger.flush();
    }
}

/// Install `logger` as the global `log` backend and raise the `log` max level
/// to its threshold.
pub fn start(logger: Arc<Logger>) -> Result<(), SetLoggerError> {
    let max_level = log::LevelFilter::from(logger.min_level());
    log::set_boxed_logger(Box::new(LogBridge::new(logger)))?;
    log::set_max_level(max_level);
    Ok(())
}
