// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Level, Settings, TimeFormat};
use clocksource::datetime::DateTime;
use std::sync::Arc;

/// A value which is computed again for every record written at a level, such
/// as the current time or the location of the log statement.
///
/// Runtime computes are attached to a level with `LevelWriter::add_runtime`
/// and are evaluated in reverse order of attachment when a record is
/// finished.
pub trait RuntimeCompute: Send + Sync {
    /// The field name the value is written under.
    fn name(&self) -> &str;

    /// Produce the value for the record described by `context`.
    fn compute(&self, context: &Context<'_>) -> Computed;

    /// Where the value goes in patterns that distinguish positions.
    fn placement(&self) -> Placement {
        Placement::Field
    }
}

/// A value produced by a `RuntimeCompute`.
#[derive(Clone, Debug, PartialEq)]
pub enum Computed {
    Text(String),
    Int(i64),
    Uint(u64),
}

/// Placement of a runtime value within a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Written as a regular `name: value` field.
    Field,
    /// Written unlabeled at the very start of the record by patterns which
    /// support it, and as a regular field by all others.
    Leading,
}

/// Information about the record being finished.
#[derive(Copy, Clone, Debug)]
pub struct Context<'a> {
    pub level: Level,
    pub file: &'a str,
    pub line: u32,
}

/// A shared, immutable list of runtime computes. The head is the most
/// recently added compute.
pub struct Computes {
    compute: Box<dyn RuntimeCompute>,
    next: Option<Arc<Computes>>,
}

impl Computes {
    pub(crate) fn push(
        compute: Box<dyn RuntimeCompute>,
        head: Option<Arc<Computes>>,
    ) -> Arc<Computes> {
        Arc::new(Computes {
            compute,
            next: head,
        })
    }

    /// Iterate over the computes, most recently added first.
    pub fn iter(&self) -> impl Iterator<Item = &dyn RuntimeCompute> {
        let mut node = Some(self);
        std::iter::from_fn(move || {
            let current = node?;
            node = current.next.as_deref();
            Some(current.compute.as_ref())
        })
    }
}

/// The current time, rendered with the time format of the `Settings`.
pub struct Timestamp {
    settings: Arc<Settings>,
}

impl Timestamp {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

impl RuntimeCompute for Timestamp {
    fn name(&self) -> &str {
        &self.settings.time
    }

    fn compute(&self, _context: &Context<'_>) -> Computed {
        match &self.settings.time_format {
            TimeFormat::Rfc3339 => Computed::Text(rfc3339()),
            TimeFormat::UnixSeconds => {
                let now = clocksource::coarse::UnixInstant::now();
                let secs = now
                    .duration_since(clocksource::coarse::UnixInstant::EPOCH)
                    .as_secs();
                Computed::Int(secs as i64)
            }
            TimeFormat::Custom(format) => time::OffsetDateTime::now_utc()
                .format(format)
                .map(Computed::Text)
                .unwrap_or_else(|_| Computed::Text(rfc3339())),
        }
    }

    fn placement(&self) -> Placement {
        Placement::Leading
    }
}

fn rfc3339() -> String {
    DateTime::from(clocksource::precise::UnixInstant::now()).to_string()
}

/// The `file:line` of the statement that finished the record.
///
/// The location is captured with `#[track_caller]` on `LevelWriter::msg`.
/// Functions that wrap the terminal calls can mark themselves
/// `#[track_caller]` to report their own caller instead.
pub struct Caller {
    settings: Arc<Settings>,
}

impl Caller {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

impl RuntimeCompute for Caller {
    fn name(&self) -> &str {
        &self.settings.caller
    }

    fn compute(&self, context: &Context<'_>) -> Computed {
        Computed::Text(format!("{}:{}", context.file, context.line))
    }
}

/// A numeric identifier for the thread that finished the record.
pub struct ThreadId {
    settings: Arc<Settings>,
}

impl ThreadId {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

impl RuntimeCompute for ThreadId {
    fn name(&self) -> &str {
        &self.settings.thread
    }

    fn compute(&self, _context: &Context<'_>) -> Computed {
        Computed::Uint(THREAD_ID.with(|id| *id))
    }
}

thread_local! {
    static THREAD_ID: u64 = parse_thread_id(std::thread::current().id());
}

// `ThreadId::as_u64` is unstable, the debug output is `ThreadId(N)`
fn parse_thread_id(id: std::thread::ThreadId) -> u64 {
    let debug = format!("{id:?}");
    debug
        .trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .parse()
        .unwrap_or(0)
}
