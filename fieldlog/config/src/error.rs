// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading a configuration document.
///
/// Errors about a single logger definition carry its id. Errors about the
/// top-level defaults use the id `default`.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("id: {id}, missing required field `{field}`")]
    MissingField { id: String, field: &'static str },
    #[error("id: {id}, field `{field}` must be {expected}")]
    WrongType {
        id: String,
        field: &'static str,
        expected: &'static str,
    },
    #[error("id: {id}, unknown {kind} `{name}`")]
    UnknownKind {
        id: String,
        kind: &'static str,
        name: String,
    },
    #[error("id: {id}, invalid `{field}`: {reason}")]
    InvalidValue {
        id: String,
        field: &'static str,
        reason: String,
    },
    #[error("id: {id}, invalid sink parameters: {source}")]
    SinkParams {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("id: {id}, failed to create sink: {source}")]
    Sink {
        id: String,
        #[source]
        source: fieldlog::Error,
    },
    #[error("duplicate logger id: {0}")]
    DuplicateId(String),
    #[error(transparent)]
    Core(#[from] fieldlog::Error),
}
