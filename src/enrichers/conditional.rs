//! Predicate-gated enrichment

use crate::core::{
    dispose_optional, Dispose, EventPredicate, LogEvent, LogEventEnricher,
    LogEventPropertyFactory, LoggingLevelSwitch, Result,
};
use std::sync::Arc;

/// Runs the wrapped enricher only for events matching a predicate
pub struct ConditionalEnricher {
    inner: Arc<dyn LogEventEnricher>,
    condition: EventPredicate,
}

impl ConditionalEnricher {
    pub fn new<F>(inner: Arc<dyn LogEventEnricher>, condition: F) -> Self
    where
        F: Fn(&LogEvent) -> bool + Send + Sync + 'static,
    {
        Self {
            inner,
            condition: Arc::new(condition),
        }
    }

    /// Enrich only events at or above the switch's current minimum level
    ///
    /// The switch is read on every call.
    pub fn at_level(inner: Arc<dyn LogEventEnricher>, switch: LoggingLevelSwitch) -> Self {
        Self::new(inner, move |event| switch.is_enabled(event.level()))
    }
}

impl LogEventEnricher for ConditionalEnricher {
    fn enrich(&self, event: &mut LogEvent, factory: &dyn LogEventPropertyFactory) -> Result<()> {
        if (self.condition)(event) {
            self.inner.enrich(event, factory)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        Some(self)
    }
}

impl Dispose for ConditionalEnricher {
    fn dispose(&self) -> Result<()> {
        dispose_optional(self.inner.as_dispose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogEventLevel, MessageTemplate, PropertyValueFactory};
    use crate::enrichers::FixedPropertyEnricher;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct DisposableEnricher {
        disposed: AtomicUsize,
    }

    impl LogEventEnricher for DisposableEnricher {
        fn enrich(&self, _: &mut LogEvent, _: &dyn LogEventPropertyFactory) -> Result<()> {
            Ok(())
        }

        fn as_dispose(&self) -> Option<&dyn Dispose> {
            Some(self)
        }
    }

    impl Dispose for DisposableEnricher {
        fn dispose(&self) -> Result<()> {
            self.disposed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn event(level: LogEventLevel) -> LogEvent {
        LogEvent::now(level, MessageTemplate::empty())
    }

    #[test]
    fn test_predicate_gates_enrichment() {
        let inner = Arc::new(FixedPropertyEnricher::with("Flag", true).unwrap());
        let enricher = ConditionalEnricher::new(inner, |e| e.level() >= LogEventLevel::Error);
        let factory = PropertyValueFactory::new();

        let mut info = event(LogEventLevel::Information);
        enricher.enrich(&mut info, &factory).unwrap();
        assert!(!info.contains_property("Flag"));

        let mut error = event(LogEventLevel::Error);
        enricher.enrich(&mut error, &factory).unwrap();
        assert!(error.contains_property("Flag"));
    }

    #[test]
    fn test_at_level_reads_switch_each_time() {
        let switch = LoggingLevelSwitch::new(LogEventLevel::Warning);
        let inner = Arc::new(FixedPropertyEnricher::with("Flag", true).unwrap());
        let enricher = ConditionalEnricher::at_level(inner, switch.clone());
        let factory = PropertyValueFactory::new();

        let mut first = event(LogEventLevel::Information);
        enricher.enrich(&mut first, &factory).unwrap();
        assert!(!first.contains_property("Flag"));

        switch.set_minimum_level(LogEventLevel::Information);
        let mut second = event(LogEventLevel::Information);
        enricher.enrich(&mut second, &factory).unwrap();
        assert!(second.contains_property("Flag"));
    }

    #[test]
    fn test_dispose_forwards_to_inner() {
        let inner = Arc::new(DisposableEnricher {
            disposed: AtomicUsize::new(0),
        });
        let enricher = ConditionalEnricher::new(inner.clone(), |_| true);
        enricher.as_dispose().unwrap().dispose().unwrap();
        assert_eq!(inner.disposed.load(Ordering::SeqCst), 1);

        // wrapping an enricher without the capability is fine too
        let plain = ConditionalEnricher::new(
            Arc::new(FixedPropertyEnricher::with("A", 1).unwrap()),
            |_| true,
        );
        plain.dispose().unwrap();
    }
}
