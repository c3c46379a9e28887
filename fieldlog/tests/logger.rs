use fieldlog::*;
use std::sync::Arc;

fn memory_logger(min_level: Level, pattern: Arc<dyn Pattern>) -> (Logger, Arc<StreamSink<Vec<u8>>>) {
    let sink = Arc::new(StreamSink::new(Vec::new()));
    let logger = Logger::new(sink.clone(), min_level, pattern);
    (logger, sink)
}

fn output(sink: &StreamSink<Vec<u8>>) -> String {
    String::from_utf8(sink.lock().clone()).unwrap()
}

#[test]
fn json_record() {
    let (logger, sink) = memory_logger(Level::Info, Arc::new(JsonPattern));

    logger.info().bool("B", true).int("INT", 10).msg("abcdefg");

    let output = output(&sink);
    assert!(output.starts_with(r#"{"level":"INFO","time":""#));
    assert!(output.ends_with("\",\"B\":true,\"INT\":10,\"msg\":\"abcdefg\"}\n"));

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["level"], "INFO");
    assert_eq!(value["B"], true);
    assert_eq!(value["INT"], 10);
    assert_eq!(value["msg"], "abcdefg");
}

#[test]
fn below_threshold_writes_nothing() {
    let (logger, sink) = memory_logger(Level::Error, Arc::new(JsonPattern));

    logger.info().bool("B", true).msg("dropped");
    logger.debug().str("k", "v").msg("dropped");
    logger
        .info()
        .add_static("static", "dropped")
        .add_runtime(ThreadId::new(logger.settings().clone()))
        .u64("n", 1)
        .msg("dropped");

    assert!(sink.lock().is_empty());

    // the disabled writer never reached the template
    logger.set_level(Level::Info);
    logger.info().msg("enabled");

    let value: serde_json::Value = serde_json::from_str(&output(&sink)).unwrap();
    assert_eq!(value["msg"], "enabled");
    assert!(value.get("static").is_none());
    assert!(value.get("cid").is_none());
}

#[test]
fn escaping_round_trips() {
    let (logger, sink) = memory_logger(Level::Trace, Arc::new(JsonPattern));

    let text = "quote \" backslash \\ tab \t newline \n bell \u{7} snow ☃ crab 🦀";
    logger
        .trace()
        .str("text", text)
        .bytes("raw", b"ok \xf0\x28\x8c\xbc")
        .hex("hex", -255)
        .f64("nan", f64::NAN)
        .f64("pi", 3.25)
        .msg(text);

    let output = output(&sink);
    assert_eq!(output.lines().count(), 1);
    assert!(output.contains("\\u0007"));
    assert!(output.contains("☃"));

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["text"], text);
    assert_eq!(value["msg"], text);
    assert_eq!(value["hex"], "-ff");
    assert_eq!(value["nan"], "NaN");
    assert_eq!(value["pi"], 3.25);
    assert!(value["raw"].as_str().unwrap().starts_with("ok \u{fffd}"));
}

#[test]
fn line_record() {
    let (logger, sink) = memory_logger(Level::Info, Arc::new(LinePattern));

    logger.info().bool("B", true).int("INT", 10).msg("abcdefg");

    let output = output(&sink);
    let (time, rest) = output.split_once('\t').unwrap();
    assert!(!time.is_empty());
    assert_eq!(rest, "level:INFO\tB:true\tINT:10\tmsg:abcdefg\n");
}

#[test]
fn runtime_computes() {
    let (logger, sink) = memory_logger(Level::Info, Arc::new(JsonPattern));
    let settings = logger.settings().clone();

    logger
        .info()
        .add_runtime(ThreadId::new(settings.clone()))
        .add_runtime(Caller::new(settings))
        .msg("configured");
    logger.info().msg("later");

    let output = output(&sink);
    let records: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 2);
    for record in &records {
        assert!(record["cid"].as_u64().is_some());
        assert!(record["caller"].as_str().unwrap().contains("logger.rs:"));
        assert!(record["time"].is_string());
    }

    // newest compute first
    let caller = output.find("\"caller\"").unwrap();
    let cid = output.find("\"cid\"").unwrap();
    let time = output.find("\"time\"").unwrap();
    assert!(caller < cid && cid < time);
}

#[test]
fn concurrent_records_do_not_interleave() {
    let (logger, sink) = memory_logger(Level::Info, Arc::new(JsonPattern));
    let logger = Arc::new(logger);

    let threads: Vec<_> = (0..8)
        .map(|thread| {
            let logger = logger.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    logger.info().u64("thread", thread).u64("i", i).msg("concurrent");
                }
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    let output = output(&sink);
    let mut count = 0;
    for line in output.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["msg"], "concurrent");
        count += 1;
    }
    assert_eq!(count, 800);
}

#[test]
fn concurrent_static_fields() {
    let (logger, sink) = memory_logger(Level::Info, Arc::new(JsonPattern));
    let logger = Arc::new(logger);

    let threads: Vec<_> = (0..4)
        .map(|thread| {
            let logger = logger.clone();
            std::thread::spawn(move || {
                logger
                    .info()
                    .add_static(&format!("static{thread}"), "set")
                    .msg("setup");
                for _ in 0..50 {
                    logger.info().msg("record");
                }
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    let output = output(&sink);
    for line in output.lines() {
        serde_json::from_str::<serde_json::Value>(line).unwrap();
    }

    logger.info().msg("last");
    let output = String::from_utf8(sink.lock().clone()).unwrap();
    let last: serde_json::Value = serde_json::from_str(output.lines().last().unwrap()).unwrap();
    for thread in 0..4 {
        assert_eq!(last[format!("static{thread}")], "set");
    }
}

#[test]
fn multi_sink() {
    let first = Arc::new(StreamSink::new(Vec::new()));
    let second = Arc::new(StreamSink::new(Vec::new()));
    let multi = MultiSink::new(vec![first.clone() as Arc<dyn Sink>, second.clone()]);
    let logger = Logger::new(Arc::new(multi), Level::Info, Arc::new(JsonPattern));

    logger.warn().msg("both");
    logger.close().unwrap();

    assert!(!first.lock().is_empty());
    assert_eq!(*first.lock(), *second.lock());
}
