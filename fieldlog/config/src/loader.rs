// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{global, ConfigError, Loggers, Registry};
use ahash::AHashSet;
use fieldlog::{Level, Logger, Settings, TimeFormat};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

const DEFAULT_ID: &str = "default";
const DEFAULT_LEVEL: Level = Level::Debug;
const DEFAULT_PATTERN: &str = "json";
const DEFAULT_SINK: &str = "console";

/// Load the loggers defined in the file at `path` into the `global` registry
/// using the built-in kinds. Returns the ids of the loaded loggers.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<String>, ConfigError> {
    load_with(path, &Registry::default(), global())
}

/// Load the loggers defined in the file at `path` into `loggers`.
pub fn load_with(
    path: impl AsRef<Path>,
    registry: &Registry,
    loggers: &Loggers,
) -> Result<Vec<String>, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_str(&text, registry, loggers)
}

/// Load the loggers defined in a JSON document into `loggers`.
///
/// Every definition is validated before any sink is created, and loggers are
/// only stored once all of them were built. Loggers stored under the same id
/// are replaced.
pub fn from_str(
    text: &str,
    registry: &Registry,
    loggers: &Loggers,
) -> Result<Vec<String>, ConfigError> {
    let document: Value = serde_json::from_str(text)?;
    let config = Config::parse(&document, registry)?;
    let built = config.build(registry)?;

    let ids = built.iter().map(|(id, _)| id.clone()).collect();
    for (id, logger) in built {
        loggers.save(id, logger);
    }
    Ok(ids)
}

/// A validated configuration document.
pub struct Config {
    settings: Arc<Settings>,
    loggers: Vec<Definition>,
}

struct Definition {
    id: String,
    level: Level,
    pattern: String,
    sink_kind: String,
    sink_params: Value,
}

impl Config {
    /// Complete every logger definition with the document defaults and check
    /// every name against `registry`.
    pub fn parse(document: &Value, registry: &Registry) -> Result<Self, ConfigError> {
        let root = document.as_object().ok_or(ConfigError::WrongType {
            id: DEFAULT_ID.to_string(),
            field: "config",
            expected: "an object",
        })?;

        let level = match root.get("level") {
            Some(value) => level(DEFAULT_ID, value)?,
            None => DEFAULT_LEVEL,
        };
        let pattern = kind(DEFAULT_ID, root, "pattern", DEFAULT_PATTERN)?;
        let sink_kind = kind(DEFAULT_ID, root, "sinkKind", DEFAULT_SINK)?;
        check(DEFAULT_ID, registry, &pattern, &sink_kind)?;

        let settings = match root.get("settings") {
            Some(value) => settings(value)?,
            None => Settings::default(),
        };

        let definitions = match root.get("loggers") {
            Some(Value::Array(definitions)) => definitions.as_slice(),
            Some(_) => {
                return Err(ConfigError::WrongType {
                    id: DEFAULT_ID.to_string(),
                    field: "loggers",
                    expected: "an array",
                })
            }
            None => &[][..],
        };

        let mut seen = AHashSet::new();
        let mut loggers = Vec::with_capacity(definitions.len());

        for (index, definition) in definitions.iter().enumerate() {
            let position = format!("loggers[{index}]");

            let definition = definition.as_object().ok_or(ConfigError::WrongType {
                id: position.clone(),
                field: "loggers",
                expected: "an object",
            })?;

            let id = match definition.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(_) => {
                    return Err(ConfigError::WrongType {
                        id: position,
                        field: "id",
                        expected: "a string",
                    })
                }
                None => {
                    return Err(ConfigError::MissingField {
                        id: position,
                        field: "id",
                    })
                }
            };

            if !seen.insert(id.clone()) {
                return Err(ConfigError::DuplicateId(id));
            }

            let level = match definition.get("level") {
                Some(value) => self::level(&id, value)?,
                None => level,
            };
            let pattern = kind(&id, definition, "pattern", &pattern)?;
            let sink_kind = kind(&id, definition, "sinkKind", &sink_kind)?;
            check(&id, registry, &pattern, &sink_kind)?;

            let sink_params = definition
                .get("sinkParams")
                .cloned()
                .ok_or_else(|| ConfigError::MissingField {
                    id: id.clone(),
                    field: "sinkParams",
                })?;

            loggers.push(Definition {
                id,
                level,
                pattern,
                sink_kind,
                sink_params,
            });
        }

        Ok(Self {
            settings: Arc::new(settings),
            loggers,
        })
    }

    /// The ids of the defined loggers, in document order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.loggers.iter().map(|definition| definition.id.as_str())
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Create the sinks and loggers.
    pub fn build(&self, registry: &Registry) -> Result<Vec<(String, Arc<Logger>)>, ConfigError> {
        let mut built = Vec::with_capacity(self.loggers.len());

        for definition in &self.loggers {
            let pattern = registry
                .pattern(&definition.pattern)
                .ok_or_else(|| ConfigError::UnknownKind {
                    id: definition.id.clone(),
                    kind: "pattern",
                    name: definition.pattern.clone(),
                })?;
            let sink = registry.sink(
                &definition.id,
                &definition.sink_kind,
                &definition.sink_params,
            )?;

            let logger = Logger::with_settings(sink, definition.level, pattern, self.settings.clone());
            built.push((definition.id.clone(), Arc::new(logger)));
        }

        Ok(built)
    }
}

/// A level is either a name or a number in `0..=7`.
fn level(id: &str, value: &Value) -> Result<Level, ConfigError> {
    match value {
        Value::String(name) => name.parse().map_err(|_| ConfigError::UnknownKind {
            id: id.to_string(),
            kind: "level",
            name: name.clone(),
        }),
        Value::Number(number) => {
            let number = number.as_u64().ok_or(ConfigError::WrongType {
                id: id.to_string(),
                field: "level",
                expected: "a level name or an integer in 0..=7",
            })?;
            Level::try_from(number).map_err(|e| ConfigError::InvalidValue {
                id: id.to_string(),
                field: "level",
                reason: e.to_string(),
            })
        }
        _ => Err(ConfigError::WrongType {
            id: id.to_string(),
            field: "level",
            expected: "a level name or an integer in 0..=7",
        }),
    }
}

fn kind(
    id: &str,
    object: &Map<String, Value>,
    field: &'static str,
    default: &str,
) -> Result<String, ConfigError> {
    match object.get(field) {
        Some(Value::String(name)) => Ok(name.to_ascii_lowercase()),
        Some(_) => Err(ConfigError::WrongType {
            id: id.to_string(),
            field,
            expected: "a string",
        }),
        None => Ok(default.to_string()),
    }
}

fn check(id: &str, registry: &Registry, pattern: &str, sink_kind: &str) -> Result<(), ConfigError> {
    if !registry.has_pattern(pattern) {
        return Err(ConfigError::UnknownKind {
            id: id.to_string(),
            kind: "pattern",
            name: pattern.to_string(),
        });
    }
    if !registry.has_sink(sink_kind) {
        return Err(ConfigError::UnknownKind {
            id: id.to_string(),
            kind: "sink",
            name: sink_kind.to_string(),
        });
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SettingsParams {
    level_name: Option<String>,
    message_name: Option<String>,
    time_name: Option<String>,
    caller_name: Option<String>,
    thread_name: Option<String>,
    target_name: Option<String>,
    time_format: Option<String>,
}

fn settings(value: &Value) -> Result<Settings, ConfigError> {
    let params = SettingsParams::deserialize(value).map_err(|e| ConfigError::InvalidValue {
        id: DEFAULT_ID.to_string(),
        field: "settings",
        reason: e.to_string(),
    })?;

    let mut settings = Settings::default();

    let names = [
        (params.level_name, &mut settings.level),
        (params.message_name, &mut settings.message),
        (params.time_name, &mut settings.time),
        (params.caller_name, &mut settings.caller),
        (params.thread_name, &mut settings.thread),
        (params.target_name, &mut settings.target),
    ];
    for (name, field) in names {
        if let Some(name) = name {
            *field = name;
        }
    }

    if let Some(format) = params.time_format {
        settings.time_format =
            format
                .parse::<TimeFormat>()
                .map_err(|e| ConfigError::InvalidValue {
                    id: DEFAULT_ID.to_string(),
                    field: "settings.timeFormat",
                    reason: e.to_string(),
                })?;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(document: Value) -> Result<Config, ConfigError> {
        Config::parse(&document, &Registry::default())
    }

    #[test]
    fn defaults_are_applied() {
        let config = parse(json!({
            "level": "WARN",
            "pattern": "line",
            "loggers": [
                { "id": "one", "sinkParams": {} },
                { "id": "two", "level": 0, "pattern": "JSON", "sinkKind": "console", "sinkParams": {} },
            ]
        }))
        .unwrap();

        assert_eq!(config.ids().collect::<Vec<_>>(), vec!["one", "two"]);

        let one = &config.loggers[0];
        assert_eq!(one.level, Level::Warn);
        assert_eq!(one.pattern, "line");
        assert_eq!(one.sink_kind, "console");

        let two = &config.loggers[1];
        assert_eq!(two.level, Level::Trace);
        assert_eq!(two.pattern, "json");
    }

    #[test]
    fn document_defaults() {
        let config = parse(json!({ "loggers": [{ "id": "one", "sinkParams": null }] })).unwrap();
        let one = &config.loggers[0];
        assert_eq!(one.level, Level::Debug);
        assert_eq!(one.pattern, "json");
        assert_eq!(one.sink_kind, "console");
        assert!(parse(json!({})).unwrap().loggers.is_empty());
    }

    #[test]
    fn levels() {
        assert_eq!(level("x", &json!("Disable")).unwrap(), Level::Disable);
        assert_eq!(level("x", &json!(7)).unwrap(), Level::Disable);
        assert!(matches!(
            level("x", &json!(8)),
            Err(ConfigError::InvalidValue { field: "level", .. })
        ));
        assert!(matches!(
            level("x", &json!(-1)),
            Err(ConfigError::WrongType { field: "level", .. })
        ));
        assert!(matches!(
            level("x", &json!(true)),
            Err(ConfigError::WrongType { field: "level", .. })
        ));
        assert!(matches!(
            level("x", &json!("loud")),
            Err(ConfigError::UnknownKind { kind: "level", .. })
        ));
    }

    #[test]
    fn missing_fields() {
        let err = parse(json!({ "loggers": [{ "sinkParams": {} }] })).err().unwrap();
        assert!(matches!(err, ConfigError::MissingField { field: "id", ref id } if id == "loggers[0]"));

        let err = parse(json!({ "loggers": [{ "id": "one" }] })).err().unwrap();
        assert!(matches!(err, ConfigError::MissingField { field: "sinkParams", ref id } if id == "one"));
    }

    #[test]
    fn wrong_types() {
        let err = parse(json!([])).err().unwrap();
        assert!(matches!(err, ConfigError::WrongType { field: "config", .. }));

        let err = parse(json!({ "loggers": {} })).err().unwrap();
        assert!(matches!(err, ConfigError::WrongType { field: "loggers", .. }));

        let err = parse(json!({ "loggers": [{ "id": 1, "sinkParams": {} }] })).err().unwrap();
        assert!(matches!(err, ConfigError::WrongType { field: "id", .. }));

        let err = parse(json!({ "pattern": 3 })).err().unwrap();
        assert!(matches!(err, ConfigError::WrongType { field: "pattern", .. }));
    }

    #[test]
    fn unknown_kinds() {
        let err = parse(json!({ "sinkKind": "socket" })).err().unwrap();
        assert!(matches!(err, ConfigError::UnknownKind { kind: "sink", ref id, .. } if id == "default"));

        let err = parse(json!({
            "loggers": [{ "id": "one", "pattern": "xml", "sinkParams": {} }]
        }))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::UnknownKind { kind: "pattern", ref id, .. } if id == "one"));
    }

    #[test]
    fn duplicate_ids() {
        let err = parse(json!({
            "loggers": [
                { "id": "one", "sinkParams": {} },
                { "id": "one", "sinkParams": {} },
            ]
        }))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::DuplicateId(ref id) if id == "one"));
    }

    #[test]
    fn settings_block() {
        let config = parse(json!({
            "settings": {
                "levelName": "l",
                "messageName": "m",
                "timeFormat": "",
            }
        }))
        .unwrap();

        let settings = config.settings();
        assert_eq!(settings.level, "l");
        assert_eq!(settings.message, "m");
        assert_eq!(settings.time, "time");
        assert!(matches!(settings.time_format, TimeFormat::UnixSeconds));

        let err = parse(json!({ "settings": { "timeFormat": "[yea" } })).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidValue { field: "settings.timeFormat", .. }));

        let err = parse(json!({ "settings": { "colour": "red" } })).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidValue { field: "settings", .. }));
    }
}
