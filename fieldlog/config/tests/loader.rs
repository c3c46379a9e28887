use fieldlog::{Level, Pattern, Sink, StreamSink};
use fieldlog_config::*;
use serde_json::json;
use std::sync::Arc;

#[test]
fn load_file() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let path = dir.path().join("log.json");

    let document = json!({
        "level": "info",
        "settings": { "levelName": "l" },
        "loggers": [
            { "id": "one", "sinkParams": {} },
            {
                "id": "two",
                "level": 3,
                "pattern": "old",
                "sinkKind": "file",
                "sinkParams": { "root": logs, "fileName": "two.log", "maxCapacityMB": 1 }
            },
            {
                "id": "three",
                "sinkKind": "multiple",
                "sinkParams": [
                    { "sinkKind": "console", "sinkParams": { "stream": "stderr" } },
                    { "sinkKind": "file", "sinkParams": { "root": logs, "fileName": "three.log", "maxCapacityMB": 1 } }
                ]
            }
        ]
    });
    std::fs::write(&path, document.to_string()).unwrap();

    let loggers = Loggers::new();
    let ids = load_with(&path, &Registry::default(), &loggers).unwrap();
    assert_eq!(ids, vec!["one", "two", "three"]);
    assert_eq!(loggers.ids(), vec!["one", "three", "two"]);

    let one = loggers.get("one").unwrap();
    assert_eq!(one.min_level(), Level::Info);
    assert_eq!(one.settings().level, "l");

    let two = loggers.get("two").unwrap();
    assert_eq!(two.min_level(), Level::Warn);
    two.info().msg("dropped");
    two.warn().str("k", "v").msg("kept");

    let three = loggers.get("three").unwrap();
    three.info().msg("both");

    loggers.close_all().unwrap();

    let content = std::fs::read_to_string(logs.join("two.log")).unwrap();
    let (_, rest) = content.split_once('\t').unwrap();
    assert_eq!(rest, "l:WARN\tk:v\tmsg:kept\n");

    let content = std::fs::read_to_string(logs.join("three.log")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["l"], "INFO");
    assert_eq!(value["msg"], "both");
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_with(dir.path().join("absent.json"), &Registry::default(), &Loggers::new())
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn invalid_json() {
    let err = from_str("{ level: }", &Registry::default(), &Loggers::new())
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn nothing_is_saved_on_error() {
    let loggers = Loggers::new();
    let document = json!({
        "loggers": [
            { "id": "good", "sinkParams": {} },
            { "id": "bad", "sinkKind": "file", "sinkParams": { "root": "/tmp" } }
        ]
    });

    let err = from_str(&document.to_string(), &Registry::default(), &loggers)
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::SinkParams { ref id, .. } if id == "bad"));
    assert!(loggers.is_empty());
}

#[test]
fn custom_kinds() {
    let memory = Arc::new(StreamSink::new(Vec::new()));

    let mut registry = Registry::default();
    let sink = memory.clone();
    registry.register_sink("memory", move |_, _, _| Ok(sink.clone() as Arc<dyn Sink>));
    registry.register_pattern("tabs", || Arc::new(fieldlog::LinePattern) as Arc<dyn Pattern>);

    let loggers = Loggers::new();
    let document = json!({
        "loggers": [{ "id": "mem", "pattern": "TABS", "sinkKind": "Memory", "sinkParams": null }]
    });
    from_str(&document.to_string(), &registry, &loggers).unwrap();

    let logger = loggers.get("mem").unwrap();
    logger.debug().bool("ok", true).msg("custom");

    let output = String::from_utf8(memory.lock().clone()).unwrap();
    assert!(output.ends_with("\tlevel:DEBUG\tok:true\tmsg:custom\n"));
}

#[test]
fn global_registry() {
    let document = json!({ "loggers": [{ "id": "global-test", "level": "error", "sinkParams": {} }] });
    from_str(&document.to_string(), &Registry::default(), global()).unwrap();

    let logger = global().get("global-test").unwrap();
    assert!(!logger.enabled(Level::Warn));
    assert!(global().remove("global-test").is_some());
}
