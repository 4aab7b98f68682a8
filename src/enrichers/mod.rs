//! Enricher implementations

pub mod conditional;
pub mod log_context;
pub mod property;
pub mod safe_aggregate;
pub mod thread;

pub use conditional::ConditionalEnricher;
pub use log_context::{ContextGuard, LogContext, LogContextEnricher};
pub use property::{FixedPropertyEnricher, PropertyEnricher};
pub use safe_aggregate::SafeAggregateEnricher;
pub use thread::ThreadEnricher;

pub use crate::core::LogEventEnricher;
