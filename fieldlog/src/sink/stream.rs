// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Sink;
use parking_lot::{Mutex, MutexGuard};
use std::io::{Result, Write};

#[cfg(feature = "metrics")]
use crate::metrics::*;

/// The standard stream a `Console` writes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Writes each record straight through to standard output or standard error.
#[derive(Debug)]
pub struct Console {
    stream: Stream,
}

impl Console {
    pub fn new(stream: Stream) -> Self {
        Self { stream }
    }

    pub fn stdout() -> Self {
        Self::new(Stream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(Stream::Stderr)
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }
}

impl Sink for Console {
    fn write(&self, record: &[u8]) -> Result<usize> {
        match self.stream {
            Stream::Stdout => std::io::stdout().lock().write_all(record)?,
            Stream::Stderr => std::io::stderr().lock().write_all(record)?,
        }
        metrics! {
            LOG_WRITE.increment();
            LOG_WRITE_BYTE.add(record.len() as _);
        }
        Ok(record.len())
    }

    fn flush(&self) -> Result<()> {
        match self.stream {
            Stream::Stdout => std::io::stdout().flush(),
            Stream::Stderr => std::io::stderr().flush(),
        }
    }

    fn close(&self) -> Result<()> {
        self.flush()
    }
}

/// Writes each record straight through to any `Write` implementation.
///
/// Records are written under a lock, so concurrent records never interleave.
pub struct StreamSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Lock the inner writer, for example to inspect what has been written to
    /// an in-memory buffer.
    pub fn lock(&self) -> MutexGuard<'_, W> {
        self.writer.lock()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Sink for StreamSink<W> {
    fn write(&self, record: &[u8]) -> Result<usize> {
        self.writer.lock().write_all(record)?;
        metrics! {
            LOG_WRITE.increment();
            LOG_WRITE_BYTE.add(record.len() as _);
        }
        Ok(record.len())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()
    }

    fn close(&self) -> Result<()> {
        self.flush()
    }
}
