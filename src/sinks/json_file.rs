//! JSON-lines file sink

use crate::core::{
    Dispose, LogEvent, LogEventSink, LoggerError, OutputFormat, Result, TimestampFormat,
};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends each event to a file as a single-line JSON object
///
/// Output is buffered; `flush` or `dispose` pushes it to disk. After
/// disposal the file is closed and further events are rejected.
pub struct JsonFileSink {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
    timestamp_format: TimestampFormat,
}

impl JsonFileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            writer: Mutex::new(Some(BufWriter::new(file))),
            timestamp_format: TimestampFormat::default(),
        })
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogEventSink for JsonFileSink {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        let line = OutputFormat::Json.format(event, &self.timestamp_format);
        let mut guard = self.writer.lock();
        let writer = guard
            .as_mut()
            .ok_or_else(|| LoggerError::sink(self.name(), "sink has been disposed"))?;
        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        if let Some(writer) = self.writer.lock().as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "json_file"
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        Some(self)
    }
}

impl Dispose for JsonFileSink {
    fn dispose(&self) -> Result<()> {
        if let Some(mut writer) = self.writer.lock().take() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for JsonFileSink {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.get_mut().as_mut() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogEventLevel, MessageTemplate};
    use std::fs;
    use tempfile::tempdir;

    fn event(user: i64) -> LogEvent {
        LogEvent::now(LogEventLevel::Information, MessageTemplate::parse("User {UserId} logged in"))
            .with_property("UserId", user)
            .unwrap()
    }

    #[test]
    fn test_json_file_sink() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("events.jsonl");

        let sink = JsonFileSink::new(&path)?;
        sink.emit(&event(123))?;
        sink.emit(&event(456))?;
        sink.flush()?;

        let content = fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0])?;
        assert_eq!(first["message"], "User 123 logged in");
        assert_eq!(first["properties"]["UserId"], 123);
        assert_eq!(first["level"], "Information");
        Ok(())
    }

    #[test]
    fn test_dispose_flushes_and_closes() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("closed.jsonl");

        let sink = JsonFileSink::new(&path)?;
        sink.emit(&event(1))?;
        sink.dispose()?;

        assert_eq!(fs::read_to_string(&path)?.lines().count(), 1);
        assert!(sink.emit(&event(2)).is_err());
        // second dispose is harmless
        sink.dispose()?;
        Ok(())
    }

    #[test]
    fn test_appends_to_existing_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("append.jsonl");

        {
            let sink = JsonFileSink::new(&path)?;
            sink.emit(&event(1))?;
        }
        let sink = JsonFileSink::new(&path)?;
        sink.emit(&event(2))?;
        sink.flush()?;

        assert_eq!(fs::read_to_string(&path)?.lines().count(), 2);
        Ok(())
    }
}
