//! Event filters
//!
//! A filter decides whether an event continues down a sink branch. Any
//! `Fn(&LogEvent) -> bool` is a filter; implement [`LogEventFilter`]
//! directly when evaluation can fail.

use super::error::{panic_message, LoggerError, Result};
use super::log_event::LogEvent;
use super::property_value::{PropertyValue, ScalarValue};
use std::sync::Arc;

/// Property holding the logical source of an event (module or type path)
pub const SOURCE_CONTEXT_PROPERTY: &str = "SourceContext";

/// Shared event predicate used by conditional sinks and enrichers
pub type EventPredicate = Arc<dyn Fn(&LogEvent) -> bool + Send + Sync>;

pub trait LogEventFilter: Send + Sync {
    /// `Ok(true)` lets the event through
    fn is_enabled(&self, event: &LogEvent) -> Result<bool>;
}

impl<F> LogEventFilter for F
where
    F: Fn(&LogEvent) -> bool + Send + Sync,
{
    fn is_enabled(&self, event: &LogEvent) -> Result<bool> {
        Ok(self(event))
    }
}

/// Evaluate a filter, turning a panic into a `Filter` error
pub(crate) fn evaluate_guarded(filter: &dyn LogEventFilter, event: &LogEvent) -> Result<bool> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| filter.is_enabled(event))) {
        Ok(result) => result,
        Err(panic_info) => Err(LoggerError::filter(format!(
            "filter panicked: {}",
            panic_message(panic_info.as_ref())
        ))),
    }
}

/// True if `context` is `prefix` or a descendant of it (`.` or `::` separated)
pub fn source_matches(context: &str, prefix: &str) -> bool {
    match context.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('.') || rest.starts_with("::"),
        None => false,
    }
}

/// The `SourceContext` of an event, when it is a string scalar
pub fn source_context(event: &LogEvent) -> Option<&str> {
    match event.property(SOURCE_CONTEXT_PROPERTY)? {
        PropertyValue::Scalar(ScalarValue::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

/// Common event predicates
pub struct Matching;

impl Matching {
    /// Events that carry a property named `name`
    pub fn with_property(name: impl Into<String>) -> impl Fn(&LogEvent) -> bool + Send + Sync {
        let name = name.into();
        move |event| event.contains_property(&name)
    }

    /// Events whose property `name` equals `value`
    pub fn with_property_value(
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> impl Fn(&LogEvent) -> bool + Send + Sync {
        let name = name.into();
        let value = value.into();
        move |event| event.property(&name) == Some(&value)
    }

    /// Events whose `SourceContext` is `prefix` or nested beneath it
    pub fn from_source(prefix: impl Into<String>) -> impl Fn(&LogEvent) -> bool + Send + Sync {
        let prefix = prefix.into();
        move |event| source_context(event).is_some_and(|context| source_matches(context, &prefix))
    }
}

/// Drops events matching the predicate
pub struct ByExcluding<F> {
    predicate: F,
}

impl<F: Fn(&LogEvent) -> bool + Send + Sync> ByExcluding<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F: Fn(&LogEvent) -> bool + Send + Sync> LogEventFilter for ByExcluding<F> {
    fn is_enabled(&self, event: &LogEvent) -> Result<bool> {
        Ok(!(self.predicate)(event))
    }
}

/// Keeps only events matching the predicate
pub struct ByIncludingOnly<F> {
    predicate: F,
}

impl<F: Fn(&LogEvent) -> bool + Send + Sync> ByIncludingOnly<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F: Fn(&LogEvent) -> bool + Send + Sync> LogEventFilter for ByIncludingOnly<F> {
    fn is_enabled(&self, event: &LogEvent) -> Result<bool> {
        Ok((self.predicate)(event))
    }
}
