//! Ambient, scoped properties
//!
//! `LogContext` keeps a per-thread stack of properties. Pushing returns a
//! [`ContextGuard`]; the property stays on the stack until the guard is
//! dropped. [`LogContextEnricher`] copies the stack onto each event, with
//! the most recently pushed property winning a name clash.
//!
//! # Example
//!
//! ```
//! use structured_logger::enrichers::LogContext;
//!
//! {
//!     let _guard = LogContext::push_property("RequestId", "abc-123").unwrap();
//!     // events enriched on this thread now carry RequestId
//! }
//! // RequestId removed here
//! ```

use crate::core::{
    LogEvent, LogEventEnricher, LogEventProperty, LogEventPropertyFactory, PropertyValue, Result,
};
use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static STACK: RefCell<Vec<LogEventProperty>> = const { RefCell::new(Vec::new()) };
}

pub struct LogContext;

impl LogContext {
    /// Push a property for the current thread until the guard is dropped
    pub fn push_property(
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<ContextGuard> {
        let property = LogEventProperty::new(name, value)?;
        let depth = STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(property);
            stack.len() - 1
        });
        Ok(ContextGuard {
            depth,
            _not_send: PhantomData,
        })
    }

    /// Snapshot of the current thread's properties, oldest first
    pub fn current() -> Vec<LogEventProperty> {
        STACK.with(|stack| stack.borrow().clone())
    }
}

/// RAII guard for a pushed context property
///
/// Dropping the guard removes its property and anything pushed after it.
#[must_use = "the property is removed as soon as the guard is dropped"]
pub struct ContextGuard {
    depth: usize,
    // The stack is thread-local; the guard must be dropped on the same thread.
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        STACK.with(|stack| stack.borrow_mut().truncate(self.depth));
    }
}

/// Adds the current thread's `LogContext` properties to each event
#[derive(Debug, Clone, Copy, Default)]
pub struct LogContextEnricher;

impl LogEventEnricher for LogContextEnricher {
    fn enrich(&self, event: &mut LogEvent, _factory: &dyn LogEventPropertyFactory) -> Result<()> {
        STACK.with(|stack| {
            for property in stack.borrow().iter().rev() {
                if !event.contains_property(property.name()) {
                    event.add_property_if_absent(property.clone());
                }
            }
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "log_context"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogEventLevel, MessageTemplate, PropertyValueFactory};

    fn enriched() -> LogEvent {
        let mut event = LogEvent::now(LogEventLevel::Information, MessageTemplate::empty());
        LogContextEnricher
            .enrich(&mut event, &PropertyValueFactory::new())
            .unwrap();
        event
    }

    #[test]
    fn test_guard_scopes_property() {
        {
            let _guard = LogContext::push_property("RequestId", "abc").unwrap();
            assert_eq!(enriched().property("RequestId"), Some(&PropertyValue::from("abc")));
        }
        assert!(!enriched().contains_property("RequestId"));
        assert!(LogContext::current().is_empty());
    }

    #[test]
    fn test_innermost_push_wins() {
        let _outer = LogContext::push_property("Scope", "outer").unwrap();
        {
            let _inner = LogContext::push_property("Scope", "inner").unwrap();
            assert_eq!(enriched().property("Scope"), Some(&PropertyValue::from("inner")));
        }
        assert_eq!(enriched().property("Scope"), Some(&PropertyValue::from("outer")));
    }

    #[test]
    fn test_context_is_per_thread() {
        let _guard = LogContext::push_property("Local", 1).unwrap();
        let other = std::thread::spawn(|| enriched().contains_property("Local"))
            .join()
            .unwrap();
        assert!(!other);
    }

    #[test]
    fn test_invalid_name_rejected() {
        assert!(LogContext::push_property("bad name", 1).is_err());
    }
}
