// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Computes, Context, Level, Pattern, RuntimeCompute, Settings, Sink, Timestamp};
use parking_lot::RwLock;
use std::fmt::Arguments;
use std::io::Result;
use std::panic::Location;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use crate::metrics::*;

// smallest buffer handed to a new record
const MIN_CAPACITY: usize = 256;

/// The long-lived record prototype for one level of a `Logger`.
///
/// The buffer holds the opening token of the pattern and every static field
/// added to the level so far. Records copy it when they are created, and
/// `add_static` and `add_runtime` on any record write back to it.
pub(crate) struct Template {
    level: Level,
    pattern: Arc<dyn Pattern>,
    sink: Arc<dyn Sink>,
    settings: Arc<Settings>,
    state: RwLock<TemplateState>,
}

struct TemplateState {
    buffer: Vec<u8>,
    computes: Option<Arc<Computes>>,
}

impl Template {
    /// Create a template seeded with the level name and a timestamp.
    pub(crate) fn new(
        level: Level,
        pattern: Arc<dyn Pattern>,
        sink: Arc<dyn Sink>,
        settings: Arc<Settings>,
    ) -> Arc<Self> {
        let mut buffer = Vec::with_capacity(MIN_CAPACITY);
        pattern.init(&mut buffer);
        pattern.append_key(&mut buffer, &settings.level);
        pattern.append_str(&mut buffer, level.as_str());

        let computes = Computes::push(Box::new(Timestamp::new(settings.clone())), None);

        Arc::new(Self {
            level,
            pattern,
            sink,
            settings,
            state: RwLock::new(TemplateState {
                buffer,
                computes: Some(computes),
            }),
        })
    }

    /// Start a new record from the current contents of the template.
    pub(crate) fn record(self: &Arc<Self>) -> LevelWriter {
        let state = self.state.read();

        let mut buffer = Vec::with_capacity(state.buffer.capacity().max(MIN_CAPACITY));
        buffer.extend_from_slice(&state.buffer);

        LevelWriter::Active(Record {
            prefix: buffer.len(),
            buffer,
            computes: state.computes.clone(),
            template: self.clone(),
        })
    }
}

/// A record which is being built. Created by the level accessors of a
/// `Logger` and only usable through `LevelWriter`.
pub struct Record {
    buffer: Vec<u8>,
    // length of the copied template contents at the start of `buffer`
    prefix: usize,
    computes: Option<Arc<Computes>>,
    template: Arc<Template>,
}

impl Record {
    fn field(mut self, key: &str, append: impl FnOnce(&dyn Pattern, &mut Vec<u8>)) -> Self {
        let pattern = self.template.pattern.as_ref();
        pattern.append_key(&mut self.buffer, key);
        append(pattern, &mut self.buffer);
        self
    }

    fn finish(mut self, message: &str, file: &str, line: u32) -> Result<()> {
        let template = self.template.as_ref();
        let pattern = template.pattern.as_ref();
        let context = Context {
            level: template.level,
            file,
            line,
        };

        // runtime values go between the static prefix and the record's fields
        let fields = self.buffer.len() - self.prefix;
        if let Some(computes) = &self.computes {
            for compute in computes.iter() {
                pattern.append_runtime(&mut self.buffer, fields, compute, &context);
            }
        }

        pattern.append_key(&mut self.buffer, &template.settings.message);
        pattern.append_str(&mut self.buffer, message);
        pattern.complete(&mut self.buffer);

        match template.sink.write(&self.buffer) {
            Ok(_) => Ok(()),
            Err(e) => {
                metrics! {
                    LOG_WRITE_EX.increment();
                }
                Err(e)
            }
        }
    }
}

/// Builds one record through a chain of typed field calls, ending with `msg`.
///
/// ```no_run
/// # use fieldlog::{Console, JsonPattern, Level, Logger};
/// # use std::sync::Arc;
/// # let logger = Logger::new(Arc::new(Console::stdout()), Level::Info, Arc::new(JsonPattern));
/// logger
///     .warn()
///     .str("user", "alice")
///     .u64("attempts", 3)
///     .msg("login failed");
/// ```
///
/// Levels below the threshold of the logger produce `LevelWriter::Disabled`,
/// on which every call does nothing.
pub enum LevelWriter {
    Active(Record),
    Disabled,
}

impl LevelWriter {
    fn field(self, key: &str, append: impl FnOnce(&dyn Pattern, &mut Vec<u8>)) -> Self {
        match self {
            LevelWriter::Active(record) => LevelWriter::Active(record.field(key, append)),
            LevelWriter::Disabled => LevelWriter::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, LevelWriter::Active(_))
    }

    /// The level of the record, `None` for a disabled writer.
    pub fn level(&self) -> Option<Level> {
        match self {
            LevelWriter::Active(record) => Some(record.template.level),
            LevelWriter::Disabled => None,
        }
    }

    pub fn int(self, key: &str, value: isize) -> Self {
        self.field(key, |p, buf| p.append_i64(buf, value as i64, 10))
    }

    pub fn i64(self, key: &str, value: i64) -> Self {
        self.field(key, |p, buf| p.append_i64(buf, value, 10))
    }

    pub fn uint(self, key: &str, value: usize) -> Self {
        self.field(key, |p, buf| p.append_u64(buf, value as u64, 10))
    }

    pub fn u64(self, key: &str, value: u64) -> Self {
        self.field(key, |p, buf| p.append_u64(buf, value, 10))
    }

    /// Write an integer in base 16, for example `-ff`.
    pub fn hex(self, key: &str, value: i64) -> Self {
        self.field(key, |p, buf| p.append_i64(buf, value, 16))
    }

    pub fn f32(self, key: &str, value: f32) -> Self {
        self.field(key, |p, buf| p.append_f32(buf, value))
    }

    pub fn f64(self, key: &str, value: f64) -> Self {
        self.field(key, |p, buf| p.append_f64(buf, value))
    }

    pub fn bool(self, key: &str, value: bool) -> Self {
        self.field(key, |p, buf| p.append_bool(buf, value))
    }

    pub fn str(self, key: &str, value: &str) -> Self {
        self.field(key, |p, buf| p.append_str(buf, value))
    }

    /// Write bytes as a string. Invalid UTF-8 sequences are replaced with
    /// U+FFFD.
    pub fn bytes(self, key: &str, value: &[u8]) -> Self {
        self.field(key, |p, buf| p.append_bytes(buf, value))
    }

    /// Add a field to every future record of this level.
    ///
    /// Returns a fresh record from the updated template, so fields already
    /// added to this record are dropped. Meant for setting up a logger, not
    /// for use while logging.
    pub fn add_static(self, key: &str, value: &str) -> Self {
        match self {
            LevelWriter::Active(record) => {
                let template = record.template;
                {
                    let mut state = template.state.write();
                    template.pattern.append_key(&mut state.buffer, key);
                    template.pattern.append_str(&mut state.buffer, value);
                }
                template.record()
            }
            LevelWriter::Disabled => LevelWriter::Disabled,
        }
    }

    /// Add a runtime compute to this record and to every future record of
    /// this level. Runtime values are written newest first.
    pub fn add_runtime<C: RuntimeCompute + 'static>(self, compute: C) -> Self {
        match self {
            LevelWriter::Active(mut record) => {
                let head = {
                    let mut state = record.template.state.write();
                    let head = Computes::push(Box::new(compute), state.computes.take());
                    state.computes = Some(head.clone());
                    head
                };
                record.computes = Some(head);
                LevelWriter::Active(record)
            }
            LevelWriter::Disabled => LevelWriter::Disabled,
        }
    }

    /// Finish the record with a message and hand it to the sink. Write errors
    /// are counted and dropped; use `try_msg` to handle them.
    #[track_caller]
    pub fn msg(self, message: &str) {
        let _ = self.try_msg(message);
    }

    /// Finish the record with a formatted message.
    ///
    /// ```no_run
    /// # use fieldlog::{Console, JsonPattern, Level, Logger};
    /// # use std::sync::Arc;
    /// # let logger = Logger::new(Arc::new(Console::stdout()), Level::Info, Arc::new(JsonPattern));
    /// let port = 8080;
    /// logger.info().msgf(format_args!("listening on {port}"));
    /// ```
    #[track_caller]
    pub fn msgf(self, args: Arguments<'_>) {
        if let LevelWriter::Active(_) = self {
            let location = Location::caller();
            let _ = match args.as_str() {
                Some(message) => self.finish(message, location.file(), location.line()),
                None => self.finish(&args.to_string(), location.file(), location.line()),
            };
        }
    }

    /// Finish the record with a message and return the result of the sink
    /// write. A disabled writer always succeeds.
    #[track_caller]
    pub fn try_msg(self, message: &str) -> Result<()> {
        let location = Location::caller();
        self.finish(message, location.file(), location.line())
    }

    /// Finish the record, reporting `file:line` to runtime computes instead
    /// of the caller's location.
    pub(crate) fn finish(self, message: &str, file: &str, line: u32) -> Result<()> {
        match self {
            LevelWriter::Active(record) => record.finish(message, file, line),
            LevelWriter::Disabled => Ok(()),
        }
    }
}
