// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::writer::Template;
use crate::{Console, JsonPattern, Level, LevelWriter, Pattern, Settings, Sink};
use core::sync::atomic::{AtomicU8, Ordering};
use std::io::Result;
use std::sync::{Arc, OnceLock};

/// Dispatches records by level to a shared `Pattern` and `Sink`.
///
/// Each level has its own record template. Templates are created the first
/// time their level is enabled and are kept for the life of the logger, so
/// static fields and runtime computes added to a level survive changes to the
/// threshold.
pub struct Logger {
    templates: [OnceLock<Arc<Template>>; 7],
    min_level: AtomicU8,
    pattern: Arc<dyn Pattern>,
    sink: Arc<dyn Sink>,
    settings: Arc<Settings>,
}

impl Logger {
    /// Create a logger with default `Settings`. Records below `min_level` are
    /// discarded.
    pub fn new(sink: Arc<dyn Sink>, min_level: Level, pattern: Arc<dyn Pattern>) -> Self {
        Self::with_settings(sink, min_level, pattern, Arc::new(Settings::default()))
    }

    pub fn with_settings(
        sink: Arc<dyn Sink>,
        min_level: Level,
        pattern: Arc<dyn Pattern>,
        settings: Arc<Settings>,
    ) -> Self {
        let logger = Self {
            templates: Default::default(),
            min_level: AtomicU8::new(Level::Disable as u8),
            pattern,
            sink,
            settings,
        };
        logger.set_level(min_level);
        logger
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Change the threshold. Levels which become enabled for the first time
    /// get a new template, previously customized levels keep theirs.
    pub fn set_level(&self, min_level: Level) {
        for level in Level::ALL.iter().filter(|level| **level >= min_level) {
            self.template(*level);
        }
        self.min_level.store(min_level as u8, Ordering::Relaxed);
    }

    pub fn min_level(&self) -> Level {
        Level::try_from(self.min_level.load(Ordering::Relaxed) as u64).unwrap_or(Level::Disable)
    }

    /// Returns true if records at `level` are written.
    pub fn enabled(&self, level: Level) -> bool {
        level != Level::Disable && level as u8 >= self.min_level.load(Ordering::Relaxed)
    }

    /// Start a record at the given level.
    pub fn level(&self, level: Level) -> LevelWriter {
        if !self.enabled(level) {
            return LevelWriter::Disabled;
        }
        self.template(level).record()
    }

    pub fn trace(&self) -> LevelWriter {
        self.level(Level::Trace)
    }

    pub fn debug(&self) -> LevelWriter {
        self.level(Level::Debug)
    }

    pub fn info(&self) -> LevelWriter {
        self.level(Level::Info)
    }

    pub fn warn(&self) -> LevelWriter {
        self.level(Level::Warn)
    }

    pub fn error(&self) -> LevelWriter {
        self.level(Level::Error)
    }

    /// Start a record at `Level::Fatal`. Finishing the record does not exit
    /// the process.
    pub fn fatal(&self) -> LevelWriter {
        self.level(Level::Fatal)
    }

    /// Start a record at `Level::Panic`. Finishing the record does not panic.
    pub fn panic(&self) -> LevelWriter {
        self.level(Level::Panic)
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn pattern(&self) -> &Arc<dyn Pattern> {
        &self.pattern
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    /// Close the sink. Records written afterwards may be rejected by it.
    pub fn close(&self) -> Result<()> {
        self.sink.close()
    }

    fn template(&self, level: Level) -> &Arc<Template> {
        self.templates[level.index()].get_or_init(|| {
            Template::new(
                level,
                self.pattern.clone(),
                self.sink.clone(),
                self.settings.clone(),
            )
        })
    }
}

/// A builder for a `Logger`. Without further configuration it produces a
/// logger which writes JSON records at `Level::Info` and above to standard
/// output.
pub struct Builder {
    sink: Option<Arc<dyn Sink>>,
    min_level: Level,
    pattern: Arc<dyn Pattern>,
    settings: Arc<Settings>,
}

impl Builder {
    fn new() -> Self {
        Self {
            sink: None,
            min_level: Level::Info,
            pattern: Arc::new(JsonPattern),
            settings: Arc::new(Settings::default()),
        }
    }

    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    pub fn pattern(mut self, pattern: Arc<dyn Pattern>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    /// Consumes this `Builder` and produces a `Logger`.
    pub fn build(self) -> Logger {
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(Console::stdout()) as Arc<dyn Sink>);
        Logger::with_settings(sink, self.min_level, self.pattern, self.settings)
    }
}
