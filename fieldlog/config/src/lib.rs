// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Builds `fieldlog` loggers from a JSON document and keeps them in a
//! registry by id.
//!
//! ```json
//! {
//!     "level": "info",
//!     "pattern": "json",
//!     "sinkKind": "console",
//!     "settings": { "levelName": "l", "timeFormat": "" },
//!     "loggers": [
//!         { "id": "stdout", "sinkParams": { "stream": "stdout" } },
//!         {
//!             "id": "audit",
//!             "level": "warn",
//!             "pattern": "line",
//!             "sinkKind": "file",
//!             "sinkParams": { "root": "/var/log/app", "fileName": "audit.log", "maxCapacityMB": 100 }
//!         },
//!         {
//!             "id": "both",
//!             "sinkKind": "multi",
//!             "sinkParams": [
//!                 { "sinkKind": "console", "sinkParams": {} },
//!                 { "sinkKind": "file", "sinkParams": { "root": "/var/log/app", "fileName": "both.log", "maxCapacityMB": 10 } }
//!             ]
//!         }
//!     ]
//! }
//! ```
//!
//! The top-level `level`, `pattern` and `sinkKind` are defaults for loggers
//! which leave them out, and default to `debug`, `json` and `console`. Levels
//! can be given by name or as a number from 0 (`trace`) to 7 (`disable`).
//!
//! ```no_run
//! fieldlog_config::load("log.json").expect("invalid logging config");
//!
//! let audit = fieldlog_config::global().get("audit").expect("no audit logger");
//! audit.warn().str("user", "alice").msg("password changed");
//! ```
//!
//! Additional pattern and sink kinds can be registered on a `Registry` and
//! used with `load_with` or `from_str`.

mod error;
mod loader;
mod loggers;
mod registry;

pub use error::ConfigError;
pub use loader::{from_str, load, load_with, Config};
pub use loggers::{global, Loggers};
pub use registry::Registry;
