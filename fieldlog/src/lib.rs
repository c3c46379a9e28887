// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! This crate provides a structured logging core that turns chains of typed
//! key/value calls into serialized records and hands them to a `Sink`.
//!
//! The core of this crate is the `Logger` type. A `Logger` keeps one record
//! template per `Level`. Each template holds a buffer that already contains
//! the opening token of the `Pattern` and any static fields (such as the level
//! name), along with a chain of `RuntimeCompute`s that are evaluated fresh for
//! every record (such as the current time). Calling a level accessor like
//! `Logger::info` copies the template into a new `LevelWriter`, which is then
//! owned by the caller until a terminal `msg` hands the finished record to the
//! sink.
//!
//! ```no_run
//! use fieldlog::{Console, JsonPattern, Level, Logger};
//! use std::sync::Arc;
//!
//! let logger = Logger::new(Arc::new(Console::stdout()), Level::Info, Arc::new(JsonPattern));
//!
//! logger.info().bool("B", true).int("INT", 10).msg("abcdefg");
//! // {"level":"INFO","time":"2021-01-01T00:00:00.000+00:00","B":true,"INT":10,"msg":"abcdefg"}
//!
//! logger.close().expect("failed to close sink");
//! ```
//!
//! Levels below the threshold of the `Logger` produce a disabled
//! `LevelWriter`. Every call on a disabled writer is a no-op, so call chains
//! never need to check whether a level is enabled.
//!
//! Records can be written in two formats: `JsonPattern` writes one JSON object
//! per line and `LinePattern` writes tab-delimited `key:value` pairs with a
//! leading timestamp.
//!
//! Finished records are handed to a `Sink`. The `Console` and `StreamSink`
//! types pass records straight through, `MultiSink` fans records out to other
//! sinks, and `FileSink` buffers records in memory and writes them to a file
//! which is rotated and gzip compressed once it exceeds a size threshold.

pub use log;

#[macro_use]
mod macros;

mod bridge;
mod encode;
mod error;
mod level;
mod logger;
mod pattern;
mod runtime;
mod settings;
mod sink;
mod writer;

pub use bridge::*;
pub use error::*;
pub use level::*;
pub use logger::*;
pub use pattern::*;
pub use runtime::*;
pub use settings::*;
pub use sink::*;
pub use writer::*;

#[cfg(feature = "metrics")]
mod metrics;

