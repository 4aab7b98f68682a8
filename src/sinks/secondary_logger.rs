//! Forwarding into a separate logger pipeline

use crate::core::{Dispose, LogEvent, LogEventSink, Logger, Result};

/// Sends events through another logger's pipeline
///
/// Each event is copied before forwarding, so enrichment done by the
/// secondary logger never shows up on the event seen by sibling sinks.
/// The secondary logger applies its own minimum level and filters.
pub struct SecondaryLoggerSink {
    logger: Logger,
    attempt_dispose: bool,
}

impl SecondaryLoggerSink {
    /// Forward to `logger` without taking ownership of its lifetime
    pub fn new(logger: Logger) -> Self {
        Self::with_dispose(logger, false)
    }

    /// Forward to `logger`, disposing it along with this sink if requested
    pub fn with_dispose(logger: Logger, attempt_dispose: bool) -> Self {
        Self {
            logger,
            attempt_dispose,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl LogEventSink for SecondaryLoggerSink {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        self.logger.write_event(event.copy())
    }

    fn flush(&self) -> Result<()> {
        self.logger.flush()
    }

    fn name(&self) -> &str {
        "secondary_logger"
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        Some(self)
    }
}

impl Dispose for SecondaryLoggerSink {
    fn dispose(&self) -> Result<()> {
        if self.attempt_dispose {
            self.logger.dispose()
        } else {
            Ok(())
        }
    }
}
