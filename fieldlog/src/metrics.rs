use metriken::{metric, Counter};

#[metric(name = "log_open", description = "number of log files which have been opened")]
pub static LOG_OPEN: Counter = Counter::new();

#[metric(
    name = "log_open_ex",
    description = "number of exceptions while opening log files"
)]
pub static LOG_OPEN_EX: Counter = Counter::new();

#[metric(name = "log_write", description = "number of records handed to sinks")]
pub static LOG_WRITE: Counter = Counter::new();

#[metric(
    name = "log_write_byte",
    description = "number of bytes handed to sinks"
)]
pub static LOG_WRITE_BYTE: Counter = Counter::new();

#[metric(
    name = "log_write_ex",
    description = "number of exceptions while writing records to sinks"
)]
pub static LOG_WRITE_EX: Counter = Counter::new();

#[metric(
    name = "log_flush",
    description = "number of times file buffers have been flushed to disk"
)]
pub static LOG_FLUSH: Counter = Counter::new();

#[metric(
    name = "log_flush_ex",
    description = "number of exceptions while flushing file buffers to disk"
)]
pub static LOG_FLUSH_EX: Counter = Counter::new();

#[metric(name = "log_rotate", description = "number of log file rotations")]
pub static LOG_ROTATE: Counter = Counter::new();

#[metric(
    name = "log_rotate_ex",
    description = "number of exceptions while rotating log files"
)]
pub static LOG_ROTATE_EX: Counter = Counter::new();

#[metric(
    name = "log_compress",
    description = "number of rotated log files which have been compressed"
)]
pub static LOG_COMPRESS: Counter = Counter::new();

#[metric(
    name = "log_compress_ex",
    description = "number of exceptions while compressing rotated log files"
)]
pub static LOG_COMPRESS_EX: Counter = Counter::new();
