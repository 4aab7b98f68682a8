//! Ties an external resource's lifetime to a sink

use crate::core::{Dispose, LogEvent, LogEventSink, Result};
use std::sync::Arc;

/// Pass-through sink that disposes an attached resource on teardown
///
/// Emission goes straight to the wrapped sink. Disposal releases only the
/// attached resource; the wrapped sink is left to whoever owns it.
pub struct DisposeDelegatingSink {
    inner: Arc<dyn LogEventSink>,
    resource: Option<Arc<dyn Dispose + Send + Sync>>,
}

impl DisposeDelegatingSink {
    pub fn new(
        inner: Arc<dyn LogEventSink>,
        resource: Option<Arc<dyn Dispose + Send + Sync>>,
    ) -> Self {
        Self { inner, resource }
    }
}

impl LogEventSink for DisposeDelegatingSink {
    fn emit(&self, event: &LogEvent) -> Result<()> {
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

impl Dispose for DisposeDelegatingSink {
    fn dispose(&self) -> Result<()> {
        match &self.resource {
            Some(resource) => resource.dispose(),
            None => Ok(()),
        }
    }
}
