//! Filter-gated sink

use crate::core::{
    dispose_optional, evaluate_guarded, Dispose, LogEvent, LogEventFilter, LogEventSink, Result,
};
use crate::self_log;
use std::sync::Arc;

/// Emits to the wrapped sink only when every filter lets the event through
///
/// Filters run in order and stop at the first rejection. A filter that
/// fails (or panics) is reported to [`SelfLog`](crate::core::SelfLog); the
/// event is then dropped, or the error returned when `propagate_exceptions`
/// is set. Errors from the wrapped sink itself are always returned.
pub struct FilteringSink {
    inner: Arc<dyn LogEventSink>,
    filters: Vec<Arc<dyn LogEventFilter>>,
    propagate_exceptions: bool,
}

impl FilteringSink {
    pub fn new(
        inner: Arc<dyn LogEventSink>,
        filters: Vec<Arc<dyn LogEventFilter>>,
        propagate_exceptions: bool,
    ) -> Self {
        Self {
            inner,
            filters,
            propagate_exceptions,
        }
    }

    fn passes(&self, event: &LogEvent) -> Result<bool> {
        for filter in &self.filters {
            match evaluate_guarded(filter.as_ref(), event) {
                Ok(true) => {}
                Ok(false) => return Ok(false),
                Err(e) => {
                    self_log!(
                        "Failed to apply filter to event \"{}\" for sink {}: {}",
                        event.message_template(),
                        self.inner.name(),
                        e
                    );
                    if self.propagate_exceptions {
                        return Err(e);
                    }
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

impl LogEventSink for FilteringSink {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        if self.passes(event)? {
            self.inner.emit(event)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        Some(self)
    }
}

impl Dispose for FilteringSink {
    fn dispose(&self) -> Result<()> {
        dispose_optional(self.inner.as_dispose())
    }
}
