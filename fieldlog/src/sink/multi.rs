// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Sink;
use std::io::{Error, ErrorKind, Result};
use std::sync::Arc;

/// Fans each record out to a list of sinks, in order.
///
/// A write stops at the first sink that fails and returns its error. Sinks
/// earlier in the list keep the record, later sinks never see it.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Arc<dyn Sink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    /// Append a sink to the end of the list.
    pub fn push(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Sink for MultiSink {
    fn write(&self, record: &[u8]) -> Result<usize> {
        if self.sinks.is_empty() {
            return Err(Error::new(ErrorKind::Other, "multi sink has no members"));
        }

        for sink in &self.sinks {
            sink.write(record)?;
        }

        Ok(record.len())
    }

    fn flush(&self) -> Result<()> {
        for sink in &self.sinks {
            sink.flush()?;
        }
        Ok(())
    }

    /// Closes every sink, even after a failure, and returns the first error.
    fn close(&self) -> Result<()> {
        let mut result = Ok(());
        for sink in &self.sinks {
            if let Err(e) = sink.close() {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StreamSink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Failing {
        writes: AtomicUsize,
        closes: AtomicUsize,
    }

    impl Sink for Failing {
        fn write(&self, _record: &[u8]) -> Result<usize> {
            self.writes.fetch_add(1, Ordering::Relaxed);
            Err(Error::new(ErrorKind::PermissionDenied, "denied"))
        }

        fn close(&self) -> Result<()> {
            self.closes.fetch_add(1, Ordering::Relaxed);
            Err(Error::new(ErrorKind::Other, "close failed"))
        }
    }

    #[test]
    fn fan_out() {
        let a = Arc::new(StreamSink::new(Vec::new()));
        let b = Arc::new(StreamSink::new(Vec::new()));
        let multi = MultiSink::new(vec![a.clone() as Arc<dyn Sink>, b.clone()]);

        assert_eq!(multi.write(b"record\n").unwrap(), 7);
        assert_eq!(&*a.lock(), b"record\n");
        assert_eq!(&*b.lock(), b"record\n");
    }

    #[test]
    fn stops_at_first_error() {
        let before = Arc::new(StreamSink::new(Vec::new()));
        let failing = Arc::new(Failing::default());
        let after = Arc::new(StreamSink::new(Vec::new()));
        let multi = MultiSink::new(vec![
            before.clone() as Arc<dyn Sink>,
            failing.clone(),
            after.clone(),
        ]);

        let err = multi.write(b"record\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(&*before.lock(), b"record\n");
        assert!(after.lock().is_empty());
        assert_eq!(failing.writes.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn close_reaches_every_sink() {
        let first = Arc::new(Failing::default());
        let second = Arc::new(Failing::default());
        let mut multi = MultiSink::default();
        multi.push(first.clone());
        multi.push(second.clone());

        assert!(multi.close().is_err());
        assert_eq!(first.closes.load(Ordering::Relaxed), 1);
        assert_eq!(second.closes.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn empty() {
        let multi = MultiSink::default();
        assert!(multi.is_empty());
        assert!(multi.write(b"record\n").is_err());
        assert!(multi.close().is_ok());
    }
}
