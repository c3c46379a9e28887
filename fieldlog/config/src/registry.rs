// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::ConfigError;
use ahash::AHashMap;
use fieldlog::{Console, FileSink, JsonPattern, LinePattern, MultiSink, Pattern, Sink, Stream};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

type PatternFactory = Box<dyn Fn() -> Arc<dyn Pattern> + Send + Sync>;
type SinkFactory =
    Box<dyn Fn(&Registry, &str, &Value) -> Result<Arc<dyn Sink>, ConfigError> + Send + Sync>;

/// Maps the pattern and sink names used in configuration documents to
/// constructors.
///
/// Names are matched without regard to ASCII case. `Registry::default` knows
/// the built-in kinds:
///
/// | kind    | names                 |
/// |---------|-----------------------|
/// | pattern | `json`, `jsonpattern` |
/// | pattern | `line`, `old`         |
/// | sink    | `console`             |
/// | sink    | `file`                |
/// | sink    | `multi`, `multiple`   |
pub struct Registry {
    patterns: AHashMap<String, PatternFactory>,
    sinks: AHashMap<String, SinkFactory>,
}

impl Registry {
    /// Create a registry without any kinds.
    pub fn empty() -> Self {
        Self {
            patterns: AHashMap::new(),
            sinks: AHashMap::new(),
        }
    }

    pub fn register_pattern<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Arc<dyn Pattern> + Send + Sync + 'static,
    {
        self.patterns
            .insert(name.to_ascii_lowercase(), Box::new(factory));
    }

    /// Register a sink kind. The factory receives the registry, so sinks can
    /// build other sinks, the id of the logger being built, and the
    /// `sinkParams` value of its definition.
    pub fn register_sink<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&Registry, &str, &Value) -> Result<Arc<dyn Sink>, ConfigError>
            + Send
            + Sync
            + 'static,
    {
        self.sinks.insert(name.to_ascii_lowercase(), Box::new(factory));
    }

    pub fn has_pattern(&self, name: &str) -> bool {
        self.patterns.contains_key(&name.to_ascii_lowercase())
    }

    pub fn has_sink(&self, name: &str) -> bool {
        self.sinks.contains_key(&name.to_ascii_lowercase())
    }

    pub fn pattern(&self, name: &str) -> Option<Arc<dyn Pattern>> {
        self.patterns
            .get(&name.to_ascii_lowercase())
            .map(|factory| factory())
    }

    /// Build a sink of the named kind for the logger `id`.
    pub fn sink(&self, id: &str, name: &str, params: &Value) -> Result<Arc<dyn Sink>, ConfigError> {
        match self.sinks.get(&name.to_ascii_lowercase()) {
            Some(factory) => factory(self, id, params),
            None => Err(ConfigError::UnknownKind {
                id: id.to_string(),
                kind: "sink",
                name: name.to_string(),
            }),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();

        for name in ["json", "jsonpattern"] {
            registry.register_pattern(name, || Arc::new(JsonPattern) as Arc<dyn Pattern>);
        }
        for name in ["line", "old"] {
            registry.register_pattern(name, || Arc::new(LinePattern) as Arc<dyn Pattern>);
        }

        registry.register_sink("console", console);
        registry.register_sink("file", file);
        for name in ["multi", "multiple"] {
            registry.register_sink(name, multi);
        }

        registry
    }
}

fn params<'a, T: Deserialize<'a>>(id: &str, value: &'a Value) -> Result<T, ConfigError> {
    T::deserialize(value).map_err(|source| ConfigError::SinkParams {
        id: id.to_string(),
        source,
    })
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "lowercase")]
enum StreamName {
    #[default]
    Stdout,
    Stderr,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConsoleParams {
    #[serde(default)]
    stream: StreamName,
}

fn console(_: &Registry, id: &str, value: &Value) -> Result<Arc<dyn Sink>, ConfigError> {
    let stream = if value.is_null() {
        StreamName::Stdout
    } else {
        params::<ConsoleParams>(id, value)?.stream
    };

    let stream = match stream {
        StreamName::Stdout => Stream::Stdout,
        StreamName::Stderr => Stream::Stderr,
    };

    Ok(Arc::new(Console::new(stream)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FileParams {
    root: PathBuf,
    file_name: String,
    #[serde(rename = "maxCapacityMB")]
    max_capacity_mb: u64,
}

fn file(_: &Registry, id: &str, value: &Value) -> Result<Arc<dyn Sink>, ConfigError> {
    let params: FileParams = params(id, value)?;

    let invalid = |reason: &str| ConfigError::InvalidValue {
        id: id.to_string(),
        field: "maxCapacityMB",
        reason: reason.to_string(),
    };

    if params.max_capacity_mb == 0 {
        return Err(invalid("must be greater than zero"));
    }

    let max_capacity = params
        .max_capacity_mb
        .checked_mul(1024 * 1024)
        .ok_or_else(|| invalid("too large"))?;

    if params.file_name.is_empty() {
        return Err(ConfigError::InvalidValue {
            id: id.to_string(),
            field: "fileName",
            reason: "must not be empty".to_string(),
        });
    }

    let sink = FileSink::builder(params.root, params.file_name)
        .max_capacity(max_capacity)
        .build()
        .map_err(|source| ConfigError::Sink {
            id: id.to_string(),
            source,
        })?;

    Ok(Arc::new(sink))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct MemberParams {
    sink_kind: String,
    sink_params: Value,
}

fn multi(registry: &Registry, id: &str, value: &Value) -> Result<Arc<dyn Sink>, ConfigError> {
    let members: Vec<MemberParams> = params(id, value)?;

    let mut sinks = Vec::with_capacity(members.len());
    for member in members {
        sinks.push(registry.sink(id, &member.sink_kind, &member.sink_params)?);
    }

    Ok(Arc::new(MultiSink::new(sinks)))
}
