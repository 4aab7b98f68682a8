//! Sink trait for log event destinations

use super::dispose::Dispose;
use super::error::{panic_message, LoggerError, Result};
use super::log_event::LogEvent;
use std::sync::Arc;

/// Terminal consumer of finished log events
///
/// `emit` receives the event by shared reference and must not retain it past
/// the call. Sinks are shared across threads, so any state they mutate lives
/// behind interior mutability.
pub trait LogEventSink: Send + Sync {
    fn emit(&self, event: &LogEvent) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Teardown capability, if this sink holds a resource
    fn as_dispose(&self) -> Option<&dyn Dispose> {
        None
    }
}

impl<S: LogEventSink + ?Sized> LogEventSink for Arc<S> {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        (**self).emit(event)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        (**self).as_dispose()
    }
}

impl<S: LogEventSink + ?Sized> LogEventSink for Box<S> {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        (**self).emit(event)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        (**self).as_dispose()
    }
}

/// Emit with panic isolation: a panicking sink becomes `SinkPanicked`
pub(crate) fn emit_guarded(sink: &dyn LogEventSink, event: &LogEvent) -> Result<()> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.emit(event))) {
        Ok(result) => result,
        Err(panic_info) => Err(LoggerError::sink_panicked(
            sink.name(),
            panic_message(panic_info.as_ref()),
        )),
    }
}
