//! Console sink

use crate::core::{
    format_text, sanitize, LogEvent, LogEventLevel, LogEventSink, OutputFormat, Result,
    TimestampFormat,
};
use colored::Colorize;
use std::io::Write;

/// Writes events to stdout, or stderr for `Error` and `Fatal`
pub struct ConsoleSink {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the output format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use structured_logger::sinks::ConsoleSink;
    /// use structured_logger::OutputFormat;
    ///
    /// let sink = ConsoleSink::new().with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Render one event as it would be written
    pub fn render(&self, event: &LogEvent) -> String {
        match self.output_format {
            OutputFormat::Text if self.use_colors => self.format_colored(event),
            OutputFormat::Text => format_text(event, &self.timestamp_format),
            OutputFormat::Json | OutputFormat::Logfmt => {
                self.output_format.format(event, &self.timestamp_format)
            }
        }
    }

    fn format_colored(&self, event: &LogEvent) -> String {
        let plain = format_text(event, &self.timestamp_format);
        let level = event.level().short_name();
        let colored_level = level.color(event.level().color_code()).to_string();
        let mut line = plain.replacen(level, &colored_level, 1);

        if let Some(exception) = event.exception() {
            let tail = format!(" exception=\"{}\"", sanitize(exception));
            if let Some(stripped) = line.strip_suffix(&tail) {
                line = format!("{}{}", stripped, tail.red());
            }
        }
        line
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink for ConsoleSink {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        let output = self.render(event);

        // Error and Fatal go to stderr, everything else to stdout
        match event.level() {
            LogEventLevel::Error | LogEventLevel::Fatal => {
                writeln!(std::io::stderr().lock(), "{}", output)?
            }
            _ => writeln!(std::io::stdout().lock(), "{}", output)?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
