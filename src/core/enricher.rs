//! Enricher trait for adding contextual properties

use super::dispose::Dispose;
use super::error::{panic_message, LoggerError, Result};
use super::log_event::LogEvent;
use super::property_factory::LogEventPropertyFactory;
use std::sync::Arc;

/// Adds properties to an event before it reaches the sinks
///
/// Enrichers should use [`LogEvent::add_property_if_absent`] so that values
/// set by the log call, or by an earlier enricher, are kept.
pub trait LogEventEnricher: Send + Sync {
    fn enrich(&self, event: &mut LogEvent, factory: &dyn LogEventPropertyFactory) -> Result<()>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Teardown capability, if this enricher holds a resource
    fn as_dispose(&self) -> Option<&dyn Dispose> {
        None
    }
}

impl<E: LogEventEnricher + ?Sized> LogEventEnricher for Arc<E> {
    fn enrich(&self, event: &mut LogEvent, factory: &dyn LogEventPropertyFactory) -> Result<()> {
        (**self).enrich(event, factory)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        (**self).as_dispose()
    }
}

/// Enrich with panic isolation: a panicking enricher becomes an `Enricher` error
pub(crate) fn enrich_guarded(
    enricher: &dyn LogEventEnricher,
    event: &mut LogEvent,
    factory: &dyn LogEventPropertyFactory,
) -> Result<()> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        enricher.enrich(event, factory)
    })) {
        Ok(result) => result,
        Err(panic_info) => Err(LoggerError::enricher(
            enricher.name(),
            format!("panicked: {}", panic_message(panic_info.as_ref())),
        )),
    }
}
