//! Best-effort enrichment over an ordered list of enrichers

use crate::core::{
    enrich_guarded, Dispose, LogEvent, LogEventEnricher, LogEventPropertyFactory, LoggerError,
    Result,
};
use crate::self_log;
use std::sync::Arc;

/// Invokes every enricher in order, isolating failures
///
/// An enricher that returns an error or panics is reported to `SelfLog`
/// and skipped; the remaining enrichers still run and `enrich` always
/// succeeds.
pub struct SafeAggregateEnricher {
    enrichers: Vec<Arc<dyn LogEventEnricher>>,
}

impl SafeAggregateEnricher {
    /// Fails with `DuplicateEnricher` if the same instance appears twice
    pub fn new(enrichers: Vec<Arc<dyn LogEventEnricher>>) -> Result<Self> {
        for (idx, enricher) in enrichers.iter().enumerate() {
            let ptr = Arc::as_ptr(enricher) as *const ();
            if enrichers[..idx]
                .iter()
                .any(|other| Arc::as_ptr(other) as *const () == ptr)
            {
                return Err(LoggerError::DuplicateEnricher {
                    enricher: enricher.name().to_string(),
                });
            }
        }
        Ok(Self { enrichers })
    }

    pub fn len(&self) -> usize {
        self.enrichers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enrichers.is_empty()
    }
}

impl LogEventEnricher for SafeAggregateEnricher {
    fn enrich(&self, event: &mut LogEvent, factory: &dyn LogEventPropertyFactory) -> Result<()> {
        for (idx, enricher) in self.enrichers.iter().enumerate() {
            if let Err(e) = enrich_guarded(enricher.as_ref(), event, factory) {
                self_log!(
                    "Enricher #{} ({}) failed on event \"{}\": {}",
                    idx,
                    enricher.name(),
                    event.message_template(),
                    e
                );
            }
        }
        Ok(())
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        Some(self)
    }
}

impl Dispose for SafeAggregateEnricher {
    /// Disposes every child that holds a resource; the first failure is
    /// returned after all children were attempted
    fn dispose(&self) -> Result<()> {
        let mut first_error = None;
        for enricher in &self.enrichers {
            if let Some(target) = enricher.as_dispose() {
                if let Err(e) = target.dispose() {
                    self_log!("Failed to dispose enricher {}: {}", enricher.name(), e);
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
