// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::io::Result;

mod file;
mod multi;
mod stream;

pub use file::*;
pub use multi::*;
pub use stream::*;

/// A destination for finished records.
///
/// Sinks are shared by every thread logging through a `Logger`, so all methods
/// take `&self` and implementations guard their own state.
pub trait Sink: Send + Sync {
    /// Accept one complete record, returning the number of bytes accepted.
    fn write(&self, record: &[u8]) -> Result<usize>;

    /// Push any buffered records to the underlying destination.
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Flush and release the destination. Records written after a sink is
    /// closed may be rejected.
    fn close(&self) -> Result<()>;
}
