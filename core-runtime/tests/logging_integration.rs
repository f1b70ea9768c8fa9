//! Integration tests for the logging system

use async_trait::async_trait;
use bridge_traits::error::Result as SinkResult;
use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{init_logging, redact_headers, redact_if_sensitive, LogFormat, LoggingConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CapturingSink {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LoggerSink for CapturingSink {
    async fn log(&self, entry: LogEntry) -> SinkResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

// The global subscriber can only be installed once per process, so every
// assertion about it lives in this one test.
#[test]
fn test_global_init_mirrors_events_to_sink() {
    let sink = Arc::new(CapturingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_filter("logging_integration=debug")
        .with_logger_sink(sink.clone());

    init_logging(config).expect("first init succeeds");

    tracing::debug!(order_id = 7, satoken = "abc123", "Order loaded");
    tracing::trace!("Below the sink level");

    let entries = sink.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "Order loaded");
    assert_eq!(entries[0].fields.get("order_id"), Some(&"7".to_string()));
    assert_eq!(
        entries[0].fields.get("satoken"),
        Some(&"[REDACTED]".to_string())
    );
    drop(entries);

    let again = init_logging(LoggingConfig::default());
    assert!(again.is_err());
}

#[test]
fn test_credential_redaction() {
    assert_eq!(redact_if_sensitive("token", "abc"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("satoken", "abc"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("Authorization", "Bearer abc"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("Set-Cookie", "JSESSIONID=1"), "[REDACTED]");
}

#[test]
fn test_email_redaction() {
    let redacted = redact_if_sensitive("username", "admin@depot.example");
    assert!(redacted.starts_with('a'));
    assert!(!redacted.contains("depot.example"));
}

#[test]
fn test_normal_values_pass_through() {
    assert_eq!(redact_if_sensitive("customer_phone", "13800000000"), "13800000000");
    assert_eq!(redact_if_sensitive("path", "/orders/7"), "/orders/7");
}

#[test]
fn test_header_redaction() {
    let headers = HashMap::from([
        ("Authorization".to_string(), "Bearer abc".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ]);

    let redacted = redact_headers(&headers);
    assert_eq!(redacted["Authorization"], "[REDACTED]");
    assert_eq!(redacted["Accept"], "application/json");
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}
