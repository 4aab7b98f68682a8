//! Fan-out to an ordered list of sinks

use crate::core::{
    emit_guarded, AggregateSinkError, Dispose, LogEvent, LogEventSink, LoggerError, Result,
};
use crate::self_log;
use std::sync::Arc;

/// Emits every event to each child sink in order
///
/// Every child is attempted even when an earlier one fails. Each failure is
/// written to [`SelfLog`](crate::core::SelfLog); once all children have run,
/// the collected failures are returned as a single
/// [`LoggerError::Aggregate`]. A swallowing aggregate reports failures the
/// same way but always returns `Ok`.
pub struct AggregateSink {
    sinks: Vec<Arc<dyn LogEventSink>>,
    propagate: bool,
}

impl AggregateSink {
    /// Aggregate that returns child failures to the caller
    pub fn new(sinks: Vec<Arc<dyn LogEventSink>>) -> Self {
        Self {
            sinks,
            propagate: true,
        }
    }

    /// Aggregate that only reports child failures to `SelfLog`
    pub fn swallowing(sinks: Vec<Arc<dyn LogEventSink>>) -> Self {
        Self {
            sinks,
            propagate: false,
        }
    }

    pub fn sinks(&self) -> &[Arc<dyn LogEventSink>] {
        &self.sinks
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn outcome(&self, errors: Vec<LoggerError>) -> Result<()> {
        if errors.is_empty() || !self.propagate {
            Ok(())
        } else {
            Err(AggregateSinkError::new(errors).into())
        }
    }
}

impl LogEventSink for AggregateSink {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        let mut errors = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = emit_guarded(sink.as_ref(), event) {
                self_log!(
                    "Caught exception while emitting to sink {}: {}",
                    sink.name(),
                    e
                );
                errors.push(e);
            }
        }
        self.outcome(errors)
    }

    fn flush(&self) -> Result<()> {
        let mut errors = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.flush() {
                self_log!("Failed to flush sink {}: {}", sink.name(), e);
                errors.push(e);
            }
        }
        self.outcome(errors)
    }

    fn name(&self) -> &str {
        "aggregate"
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        Some(self)
    }
}

impl Dispose for AggregateSink {
    /// Disposes every child that holds a resource, in order
    fn dispose(&self) -> Result<()> {
        let mut errors = Vec::new();
        for sink in &self.sinks {
            if let Some(target) = sink.as_dispose() {
                if let Err(e) = target.dispose() {
                    self_log!("Failed to dispose sink {}: {}", sink.name(), e);
                    errors.push(e);
                }
            }
        }
        self.outcome(errors)
    }
}
