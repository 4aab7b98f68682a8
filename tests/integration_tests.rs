//! Integration tests for the logging pipeline
//!
//! These tests verify:
//! - Aggregate sinks attempt every child and collect failures
//! - Restricted sinks observe level switch changes immediately
//! - Secondary loggers never mutate the event seen by sibling sinks
//! - Enricher isolation and first-writer-wins enrichment
//! - Log injection prevention in file output
//! - Self-diagnostics reporting

use parking_lot::Mutex;
use std::fs;
use std::sync::Arc;
use structured_logger::enrichers::{
    FixedPropertyEnricher, LogContext, LogContextEnricher, PropertyEnricher, SafeAggregateEnricher,
    ThreadEnricher,
};
use structured_logger::prelude::*;
use structured_logger::sinks::{DelegatingSink, JsonFileSink, MemorySink};
use structured_logger::{
    DictionaryValue, LogEventPropertyFactory, PropertyValueFactory, SequenceValue,
};
use tempfile::TempDir;

/// SelfLog is process-wide; tests that install a callback take this lock
static SELF_LOG_LOCK: Mutex<()> = parking_lot::const_mutex(());

fn capture_self_log() -> (parking_lot::MutexGuard<'static, ()>, Arc<Mutex<Vec<String>>>) {
    let guard = SELF_LOG_LOCK.lock();
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let owner = std::thread::current().id();
    SelfLog::enable(move |line| {
        if std::thread::current().id() == owner {
            sink.lock().push(line.to_string());
        }
    });
    (guard, lines)
}

fn failing_sink(label: &'static str) -> Arc<dyn LogEventSink> {
    Arc::new(DelegatingSink::new(move |_: &LogEvent| {
        Err(LoggerError::sink(label, "connection refused"))
    }))
}

fn event(level: LogEventLevel, template: &str) -> LogEvent {
    LogEvent::now(level, MessageTemplate::parse(template))
}

#[test]
fn test_aggregate_attempts_all_and_groups_errors() {
    let (_guard, lines) = capture_self_log();
    let b = Arc::new(MemorySink::new());
    let aggregate = AggregateSink::new(vec![
        failing_sink("A"),
        b.clone() as Arc<dyn LogEventSink>,
        failing_sink("C"),
    ]);

    let result = aggregate.emit(&event(LogEventLevel::Information, "fan out"));
    SelfLog::disable();

    assert_eq!(b.len(), 1, "the healthy sink must still receive the event");
    match result {
        Err(LoggerError::Aggregate(group)) => {
            assert_eq!(group.len(), 2);
            let messages: Vec<String> = group.errors().iter().map(|e| e.to_string()).collect();
            assert!(messages[0].contains("'A'"));
            assert!(messages[1].contains("'C'"));
        }
        other => panic!("expected an aggregate error, got {:?}", other),
    }
    assert_eq!(lines.lock().len(), 2, "each failure is reported to SelfLog");
}

#[test]
fn test_restricted_sink_switch_visibility() {
    let memory = Arc::new(MemorySink::new());
    let switch = LoggingLevelSwitch::new(LogEventLevel::Warning);
    let sink = RestrictedSink::new(memory.clone(), switch.clone());
    let info = event(LogEventLevel::Information, "status");

    sink.emit(&info).unwrap();
    assert!(memory.is_empty());

    switch.set_minimum_level(LogEventLevel::Information);
    sink.emit(&info).unwrap();
    assert_eq!(memory.len(), 1);
}

#[test]
fn test_secondary_logger_isolation() {
    let secondary_memory = Arc::new(MemorySink::new());
    let secondary = LoggerConfiguration::new()
        .enrich_with(Arc::new(FixedPropertyEnricher::with("Tenant", "acme").unwrap()))
        .write_to(secondary_memory.clone())
        .create_logger()
        .unwrap();

    let sibling = Arc::new(MemorySink::new());
    let primary = LoggerConfiguration::new()
        .write_to_logger(secondary, false)
        .write_to(sibling.clone())
        .create_logger()
        .unwrap();

    information!(primary, "Invoice {InvoiceId} issued", 17).unwrap();

    let secondary_event = &secondary_memory.events()[0];
    let sibling_event = &sibling.events()[0];
    assert!(secondary_event.contains_property("Tenant"));
    assert!(!sibling_event.contains_property("Tenant"));
    assert_eq!(sibling_event.render_message(), "Invoice 17 issued");
}

#[test]
fn test_first_enricher_wins() {
    let factory = PropertyValueFactory::new();
    let e1 = PropertyEnricher::new("x", &"from e1", false).unwrap();
    let e2 = PropertyEnricher::new("x", &"from e2", false).unwrap();
    let aggregate = SafeAggregateEnricher::new(vec![
        Arc::new(e1) as Arc<dyn LogEventEnricher>,
        Arc::new(e2) as Arc<dyn LogEventEnricher>,
    ])
    .unwrap();

    let mut untouched = event(LogEventLevel::Information, "no x");
    aggregate.enrich(&mut untouched, &factory).unwrap();
    assert_eq!(untouched.property("x"), Some(&PropertyValue::from("from e1")));

    let mut preset = event(LogEventLevel::Information, "{x}")
        .with_property("x", "from call")
        .unwrap();
    aggregate.enrich(&mut preset, &factory).unwrap();
    assert_eq!(preset.property("x"), Some(&PropertyValue::from("from call")));
}

struct ExplodingEnricher;

impl LogEventEnricher for ExplodingEnricher {
    fn enrich(&self, _: &mut LogEvent, _: &dyn LogEventPropertyFactory) -> Result<()> {
        Err(LoggerError::enricher("exploding", "lookup failed"))
    }
}

#[test]
fn test_failing_enricher_does_not_block_pipeline() {
    let (_guard, lines) = capture_self_log();
    let memory = Arc::new(MemorySink::new());
    let logger = LoggerConfiguration::new()
        .enrich_with(Arc::new(ExplodingEnricher))
        .enrich_with_property("After", &true, false)
        .write_to(memory.clone())
        .create_logger()
        .unwrap();

    warning!(logger, "Still delivered").unwrap();
    SelfLog::disable();

    assert_eq!(memory.len(), 1);
    assert!(memory.events()[0].contains_property("After"));
    let lines = lines.lock();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("lookup failed"));
}

#[test]
fn test_thread_and_log_context_enrichment() {
    let memory = Arc::new(MemorySink::new());
    let logger = LoggerConfiguration::new()
        .enrich_with(Arc::new(ThreadEnricher::new()))
        .enrich_with(Arc::new(LogContextEnricher))
        .write_to(memory.clone())
        .create_logger()
        .unwrap();

    {
        let _request = LogContext::push_property("RequestId", "req-9").unwrap();
        information!(logger, "inside").unwrap();
    }
    information!(logger, "outside").unwrap();

    let events = memory.events();
    assert!(events[0].contains_property("ThreadId"));
    assert_eq!(events[0].property("RequestId"), Some(&PropertyValue::from("req-9")));
    assert!(!events[1].contains_property("RequestId"));
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection.jsonl");
    let sink = Arc::new(JsonFileSink::new(&log_file).expect("Failed to create sink"));

    let logger = LoggerConfiguration::new()
        .write_to(sink.clone())
        .create_logger()
        .unwrap();

    let malicious = "alice\n{\"level\":\"Fatal\",\"message\":\"forged\"}";
    information!(logger, "User {User} logged in", malicious).unwrap();
    logger.dispose().expect("Failed to dispose");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1, "an event must occupy exactly one line");

    let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(parsed["properties"]["User"], malicious);
}

#[test]
fn test_text_output_escapes_newlines() {
    let event = event(LogEventLevel::Information, "{Input}")
        .with_property("Input", "ok\nERR forged")
        .unwrap();
    let line = OutputFormat::Text.format(&event, &TimestampFormat::Unix);
    assert_eq!(line.lines().count(), 1);
    assert!(line.contains("ok\\nERR forged"));
}

#[test]
fn test_concrete_rendering_scenarios() {
    let property = LogEventProperty::new("user_id", 42).unwrap();
    assert_eq!(property.name(), "user_id");
    assert_eq!(property.value().render_to_string(), "42");

    let sequence: PropertyValue = SequenceValue::new(vec![1.into(), 2.into()]).into();
    assert_eq!(sequence.render_to_string(), "[1, 2]");

    let dictionary: PropertyValue =
        DictionaryValue::new(vec![(ScalarValue::from("a"), PropertyValue::from(1))]).into();
    assert_eq!(dictionary.render_to_string(), "[(a: 1)]");

    let empty_sequence: PropertyValue = SequenceValue::new(Vec::new()).into();
    let empty_dictionary: PropertyValue = DictionaryValue::new(Vec::new()).into();
    assert_eq!(empty_sequence.render_to_string(), "[]");
    assert_eq!(empty_dictionary.render_to_string(), "[]");
}

#[test]
fn test_invalid_names_fail_at_construction() {
    for name in ["", "has space", ".leading", "trailing.", "dash-ed"] {
        assert!(
            matches!(
                LogEventProperty::new(name, 1),
                Err(LoggerError::InvalidPropertyName { .. })
            ),
            "{:?} should be rejected",
            name
        );
        assert!(PropertyEnricher::new(name, &1, false).is_err());
    }
}

#[test]
fn test_filtering_sink_with_matching() {
    let memory = Arc::new(MemorySink::new());
    let logger = LoggerConfiguration::new()
        .filter(ByExcludingHealthChecks)
        .write_to(memory.clone())
        .create_logger()
        .unwrap();

    information!(logger.for_source("web::health"), "ping").unwrap();
    information!(logger.for_source("web::orders"), "order").unwrap();
    assert_eq!(memory.messages(), vec!["order".to_string()]);
}

struct ByExcludingHealthChecks;

impl LogEventFilter for ByExcludingHealthChecks {
    fn is_enabled(&self, event: &LogEvent) -> Result<bool> {
        Ok(!Matching::from_source("web::health")(event))
    }
}

#[test]
fn test_dispose_cascades_through_wrappers() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("cascade.jsonl");
    let file: Arc<dyn LogEventSink> = Arc::new(JsonFileSink::new(&path).unwrap());

    let logger = LoggerConfiguration::new()
        .write_to_restricted(file, LogEventLevel::Debug)
        .create_logger()
        .unwrap();

    information!(logger, "written").unwrap();
    logger.dispose().unwrap();
    information!(logger, "after dispose").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn test_out_of_range_hints_render_through_logger() {
    let memory = Arc::new(MemorySink::new());
    let logger = LoggerConfiguration::new()
        .write_to(memory.clone())
        .create_logger()
        .unwrap();

    information!(logger, "Charged {Amount:F70000} at {Column,70000}", 12.5).unwrap();

    assert_eq!(
        memory.messages(),
        vec!["Charged 12.5 at {Column,70000}".to_string()]
    );
}
