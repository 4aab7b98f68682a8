//! Predicate- and level-gated sinks

use crate::core::{
    dispose_optional, Dispose, EventPredicate, LogEvent, LogEventSink, LoggingLevelSwitch, Result,
};
use std::sync::Arc;

/// Emits to the wrapped sink only for events matching a predicate
pub struct ConditionalSink {
    inner: Arc<dyn LogEventSink>,
    condition: EventPredicate,
}

impl ConditionalSink {
    pub fn new<F>(inner: Arc<dyn LogEventSink>, condition: F) -> Self
    where
        F: Fn(&LogEvent) -> bool + Send + Sync + 'static,
    {
        Self {
            inner,
            condition: Arc::new(condition),
        }
    }
}

impl LogEventSink for ConditionalSink {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        if (self.condition)(event) {
            self.inner.emit(event)
        } else {
            Ok(())
        }
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

impl Dispose for ConditionalSink {
    fn dispose(&self) -> Result<()> {
        dispose_optional(self.inner.as_dispose())
    }
}

/// Emits to the wrapped sink only when the event level passes a switch
///
/// The switch is read on every event, so changing it takes effect on the
/// very next call.
pub struct RestrictedSink {
    inner: Arc<dyn LogEventSink>,
    level_switch: LoggingLevelSwitch,
}

impl RestrictedSink {
    pub fn new(inner: Arc<dyn LogEventSink>, level_switch: LoggingLevelSwitch) -> Self {
        Self {
            inner,
            level_switch,
        }
    }

    pub fn level_switch(&self) -> &LoggingLevelSwitch {
        &self.level_switch
    }
}

impl LogEventSink for RestrictedSink {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        if event.level() < self.level_switch.minimum_level() {
            return Ok(());
        }
        self.inner.emit(event)
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

impl Dispose for RestrictedSink {
    fn dispose(&self) -> Result<()> {
        dispose_optional(self.inner.as_dispose())
    }
}
