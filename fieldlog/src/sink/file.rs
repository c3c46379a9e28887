// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Error, Sink};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::warn;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Result, Write};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

#[cfg(feature = "metrics")]
use crate::metrics::*;

const DEFAULT_MAX_CAPACITY: u64 = 100 * 1024 * 1024;
const DEFAULT_BUFFER_SIZE: usize = 2 * 1024 * 1024;

/// A builder for a `FileSink`.
pub struct FileSinkBuilder {
    root: PathBuf,
    file_name: String,
    max_capacity: u64,
    buffer_size: usize,
}

impl FileSinkBuilder {
    /// The size in bytes the active file may reach before it is rotated.
    /// Defaults to 100 MiB.
    pub fn max_capacity(mut self, bytes: u64) -> Self {
        self.max_capacity = bytes;
        self
    }

    /// The size of the in-memory buffer which holds records until they are
    /// written to the file. Defaults to 2 MiB.
    pub fn buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = bytes;
        self
    }

    /// Create the root directory if needed and open the active file for
    /// appending.
    pub fn build(self) -> std::result::Result<FileSink, Error> {
        if self.max_capacity == 0 {
            return Err(Error::InvalidCapacity);
        }

        std::fs::create_dir_all(&self.root).map_err(|source| Error::Open {
            path: self.root.clone(),
            source,
        })?;

        let path = self.root.join(&self.file_name);
        let file = open(&path).map_err(|source| Error::Open {
            path: path.clone(),
            source,
        })?;

        Ok(FileSink {
            root: self.root,
            file_name: self.file_name,
            path,
            max_capacity: self.max_capacity,
            buffer_size: self.buffer_size,
            state: Mutex::new(State {
                file: Some(file),
                buffer: Vec::with_capacity(self.buffer_size),
                rotated: Vec::new(),
                pending: Vec::new(),
                closed: false,
            }),
        })
    }
}

struct State {
    // `None` if reopening the active file failed, retried on the next write
    file: Option<File>,
    buffer: Vec<u8>,
    // renamed but not yet handed to compression
    rotated: Vec<PathBuf>,
    pending: Vec<JoinHandle<()>>,
    closed: bool,
}

/// Buffers records in memory and writes them to a file, rotating the file
/// once it grows past a maximum capacity.
///
/// A rotated file is renamed to `<file_name>.<MMDD>_<index>` in the same
/// directory, where the date is the current UTC date and the index is the
/// smallest positive number that does not collide with an existing file. It is
/// then gzip compressed on a background thread to `<rotated name>.gz` and
/// removed. If compression fails, the uncompressed rotated file is left in
/// place.
///
/// Records are only written to disk when the buffer fills, on `flush`, or on
/// `close`. Records larger than the buffer are written directly.
pub struct FileSink {
    root: PathBuf,
    file_name: String,
    path: PathBuf,
    max_capacity: u64,
    buffer_size: usize,
    state: Mutex<State>,
}

impl FileSink {
    pub fn builder(root: impl Into<PathBuf>, file_name: impl Into<String>) -> FileSinkBuilder {
        FileSinkBuilder {
            root: root.into(),
            file_name: file_name.into(),
            max_capacity: DEFAULT_MAX_CAPACITY,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// The path of the active file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// The active file, reopened if a previous rotation could not reopen it.
    fn active<'a>(&self, file: &'a mut Option<File>) -> Result<&'a mut File> {
        if file.is_none() {
            *file = Some(open(&self.path)?);
        }
        file.as_mut().ok_or_else(closed)
    }

    /// Write the buffer out to the active file and rotate the file if it is
    /// over capacity.
    fn flush_locked(&self, state: &mut State) -> Result<()> {
        if !state.buffer.is_empty() {
            let file = self.active(&mut state.file)?;
            if let Err(e) = file.write_all(&state.buffer) {
                metrics! {
                    LOG_FLUSH_EX.increment();
                }
                return Err(e);
            }
            state.buffer.clear();
            metrics! {
                LOG_FLUSH.increment();
            }
        }

        self.rotate_if_full(state)
    }

    fn rotate_if_full(&self, state: &mut State) -> Result<()> {
        let Some(file) = state.file.as_ref() else {
            return Ok(());
        };

        // rotation waits for the next flush if the size is unknown
        let len = match file.metadata() {
            Ok(metadata) => metadata.len(),
            Err(_) => return Ok(()),
        };

        if len <= self.max_capacity {
            return Ok(());
        }

        self.rotate(state)
    }

    /// Rename the active file and open a new one. A renamed file is recorded
    /// for compression even if the new file can not be opened.
    fn rotate(&self, state: &mut State) -> Result<()> {
        let rotated = self.rotated_path();

        // release the handle before the rename
        state.file = None;

        if let Err(e) = std::fs::rename(&self.path, &rotated) {
            metrics! {
                LOG_ROTATE_EX.increment();
            }
            state.file = open(&self.path).ok();
            return Err(e);
        }

        metrics! {
            LOG_ROTATE.increment();
        }

        state.rotated.push(rotated);
        state.file = Some(open(&self.path)?);

        Ok(())
    }

    fn write_locked(&self, state: &mut State, record: &[u8]) -> Result<()> {
        if record.len() > self.buffer_size.saturating_sub(state.buffer.len()) {
            self.flush_locked(state)?;
        }

        if record.len() >= self.buffer_size {
            self.active(&mut state.file)?.write_all(record)?;
            self.rotate_if_full(state)
        } else {
            state.buffer.extend_from_slice(record);
            Ok(())
        }
    }

    fn rotated_path(&self) -> PathBuf {
        let now = time::OffsetDateTime::now_utc();
        let date = format!("{:02}{:02}", u8::from(now.month()), now.day());

        let mut index = 1;
        loop {
            let candidate = self.root.join(format!("{}.{date}_{index}", self.file_name));
            if !candidate.exists() && !gz_path(&candidate).exists() {
                return candidate;
            }
            index += 1;
        }
    }

    /// Hand rotated files to compression threads. Files which could not be
    /// handed off are returned so they can be compressed once the lock is
    /// released.
    fn compress_in_background(state: &mut State) -> Vec<PathBuf> {
        if state.rotated.is_empty() {
            return Vec::new();
        }

        state.pending.retain(|handle| !handle.is_finished());

        let mut inline = Vec::new();
        for path in std::mem::take(&mut state.rotated) {
            let moved = path.clone();
            let spawned = std::thread::Builder::new()
                .name("fieldlog-compress".to_string())
                .spawn(move || compress(&moved));

            match spawned {
                Ok(handle) => state.pending.push(handle),
                Err(_) => inline.push(path),
            }
        }
        inline
    }
}

impl Sink for FileSink {
    fn write(&self, record: &[u8]) -> Result<usize> {
        let mut state = self.state.lock();

        if state.closed {
            return Err(closed());
        }

        // files rotated before a failure are still compressed
        let result = self.write_locked(&mut state, record);
        let inline = Self::compress_in_background(&mut state);
        drop(state);

        for path in inline {
            compress(&path);
        }

        result?;

        metrics! {
            LOG_WRITE.increment();
            LOG_WRITE_BYTE.add(record.len() as _);
        }

        Ok(record.len())
    }

    fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();

        if state.closed {
            return Ok(());
        }

        let result = self.flush_locked(&mut state);
        let inline = Self::compress_in_background(&mut state);
        drop(state);

        for path in inline {
            compress(&path);
        }

        result
    }

    /// Writes out the buffer, rotates the file if needed, and waits for all
    /// outstanding compressions to finish. Closing a closed sink does nothing.
    fn close(&self) -> Result<()> {
        let mut state = self.state.lock();

        let result = if state.closed {
            Ok(())
        } else {
            self.flush_locked(&mut state)
        };

        state.closed = true;
        state.file = None;
        state.buffer.clear();
        let rotated = std::mem::take(&mut state.rotated);
        let pending = std::mem::take(&mut state.pending);
        drop(state);

        for path in rotated {
            compress(&path);
        }

        for handle in pending {
            if handle.join().is_err() {
                warn!("compression thread panicked");
            }
        }

        result
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("failed to close log file {}: {e}", self.path.display());
        }
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "file sink is closed")
}

fn open(path: &Path) -> Result<File> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            metrics! {
                LOG_OPEN.increment();
            }
            Ok(file)
        }
        Err(e) => {
            metrics! {
                LOG_OPEN_EX.increment();
            }
            Err(e)
        }
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

fn gzip(source: &Path, destination: &Path) -> Result<()> {
    let mut input = File::open(source)?;
    let output = BufWriter::new(File::create(destination)?);
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.flush()
}

/// Compress a rotated file and remove it. On failure the partial archive is
/// removed and the rotated file is kept.
fn compress(path: &Path) {
    let destination = gz_path(path);

    match gzip(path, &destination) {
        Ok(()) => {
            metrics! {
                LOG_COMPRESS.increment();
            }
            if let Err(e) = std::fs::remove_file(path) {
                warn!("failed to remove rotated log file {}: {e}", path.display());
            }
        }
        Err(e) => {
            metrics! {
                LOG_COMPRESS_EX.increment();
            }
            let _ = std::fs::remove_file(&destination);
            warn!("failed to compress rotated log file {}: {e}", path.display());
        }
    }
}
