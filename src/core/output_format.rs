//! Text, JSON and logfmt rendering of log events
//!
//! Used by the bundled sinks; custom sinks are free to render events any
//! way they like through [`LogEvent`]'s accessors.

use super::log_event::LogEvent;
use super::property_value::{PropertyValue, ScalarValue};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// How event timestamps are written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,
    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,
    /// `2025-01-08T10:30:45+00:00`
    Rfc3339,
    /// Seconds since the Unix epoch
    Unix,
    /// Milliseconds since the Unix epoch
    UnixMillis,
    /// Any strftime pattern
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
            TimestampFormat::Iso8601Micros => datetime.to_rfc3339_opts(SecondsFormat::Micros, true),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, false),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(pattern) => datetime.format(pattern).to_string(),
        }
    }

    fn to_json(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::Unix => datetime.timestamp().into(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().into(),
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }
}

/// Output layout for a rendered event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// `[2025-01-08T10:30:45.123Z INF] User 42 signed in {UserId=42}`
    #[default]
    Text,
    /// One JSON object per event
    Json,
    /// `timestamp=... level=Information message="..." UserId=42`
    Logfmt,
}

impl OutputFormat {
    pub fn format(&self, event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => format_text(event, timestamp_format),
            OutputFormat::Json => format_json(event, timestamp_format),
            OutputFormat::Logfmt => format_logfmt(event, timestamp_format),
        }
    }
}

/// Escape line breaks so one event always occupies one line
pub(crate) fn sanitize(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

pub(crate) fn format_text(event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
    let mut line = format!(
        "[{} {}] {}",
        timestamp_format.format(&event.timestamp()),
        event.level().short_name(),
        sanitize(&event.render_message())
    );

    if !event.properties().is_empty() {
        line.push_str(" {");
        for (idx, (name, value)) in event.properties().iter().enumerate() {
            if idx > 0 {
                line.push_str(", ");
            }
            let _ = write!(line, "{}={}", name, sanitize(&value.render_to_string()));
        }
        line.push('}');
    }

    if let Some(exception) = event.exception() {
        let _ = write!(line, " exception=\"{}\"", sanitize(exception));
    }
    line
}

fn format_json(event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
    let mut json = event.to_json_value();
    if let Some(obj) = json.as_object_mut() {
        obj.insert(
            "timestamp".to_string(),
            timestamp_format.to_json(&event.timestamp()),
        );
    }
    json.to_string()
}

fn format_logfmt(event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
    let mut parts = vec![
        format!(
            "timestamp={}",
            escape_logfmt_value(&timestamp_format.format(&event.timestamp()))
        ),
        format!("level={}", event.level().to_str()),
        format!("message={}", quote_logfmt_value(&sanitize(&event.render_message()))),
    ];

    for (name, value) in event.properties() {
        let formatted = match value {
            PropertyValue::Scalar(ScalarValue::String(s)) => quote_logfmt_value(&sanitize(s)),
            PropertyValue::Scalar(scalar) => escape_logfmt_value(&scalar.to_string()),
            other => quote_logfmt_value(&sanitize(&other.render_to_string())),
        };
        parts.push(format!("{}={}", escape_logfmt_key(name), formatted));
    }

    if let Some(exception) = event.exception() {
        parts.push(format!("exception={}", quote_logfmt_value(&sanitize(exception))));
    }

    parts.join(" ")
}

fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
        .collect()
}

fn escape_logfmt_value(value: &str) -> String {
    if value.contains(' ') || value.contains('"') || value.contains('=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogEventLevel, MessageTemplate};
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap() + chrono::Duration::microseconds(123456)
    }

    fn event() -> LogEvent {
        LogEvent::new(
            fixed_datetime(),
            LogEventLevel::Warning,
            None,
            MessageTemplate::parse("Disk {Disk} at {Percent}%"),
            Vec::new(),
        )
        .with_property("Disk", "sda1")
        .unwrap()
        .with_property("Percent", 91)
        .unwrap()
    }

    #[test]
    fn test_timestamp_formats() {
        let dt = fixed_datetime();
        assert_eq!(TimestampFormat::Iso8601.format(&dt), "2025-01-08T10:30:45.123Z");
        assert_eq!(TimestampFormat::Iso8601Micros.format(&dt), "2025-01-08T10:30:45.123456Z");
        assert_eq!(TimestampFormat::Rfc3339.format(&dt), "2025-01-08T10:30:45+00:00");
        assert_eq!(TimestampFormat::Unix.format(&dt), "1736332245");
        assert_eq!(TimestampFormat::UnixMillis.format(&dt), "1736332245123");
        assert_eq!(
            TimestampFormat::Custom("%d/%m/%Y".to_string()).format(&dt),
            "08/01/2025"
        );
    }

    #[test]
    fn test_text_format() {
        let line = OutputFormat::Text.format(&event(), &TimestampFormat::Iso8601);
        assert_eq!(
            line,
            "[2025-01-08T10:30:45.123Z WRN] Disk sda1 at 91% {Disk=sda1, Percent=91}"
        );
    }

    #[test]
    fn test_text_format_escapes_newlines() {
        let event = event()
            .with_property("Disk", "sda1\nERR fake entry")
            .unwrap()
            .with_exception("line one\nline two");
        let line = OutputFormat::Text.format(&event, &TimestampFormat::Iso8601);
        assert_eq!(line.lines().count(), 1);
        assert!(line.contains("sda1\\nERR fake entry"));
        assert!(line.contains("exception=\"line one\\nline two\""));
    }

    #[test]
    fn test_json_format() {
        let line = OutputFormat::Json.format(&event(), &TimestampFormat::UnixMillis);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["timestamp"], 1736332245123i64);
        assert_eq!(parsed["level"], "Warning");
        assert_eq!(parsed["message"], "Disk sda1 at 91%");
        assert_eq!(parsed["properties"]["Percent"], 91);
    }

    #[test]
    fn test_logfmt_format() {
        let event = event().with_property("Query", "id=1").unwrap();
        let line = OutputFormat::Logfmt.format(&event, &TimestampFormat::Iso8601);
        assert!(line.starts_with("timestamp=2025-01-08T10:30:45.123Z level=Warning"));
        assert!(line.contains("message=\"Disk sda1 at 91%\""));
        assert!(line.contains("Disk=\"sda1\""));
        assert!(line.contains("Percent=91"));
        assert!(line.contains("Query=\"id=1\""));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
