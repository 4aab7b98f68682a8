//! Sink implementations
//!
//! Composite sinks (`AggregateSink`, `ConditionalSink`, `RestrictedSink`,
//! `FilteringSink`, `SecondaryLoggerSink`, `DisposeDelegatingSink`) wrap
//! other sinks behind `Arc<dyn LogEventSink>`; the rest write events out.

pub mod aggregate;
pub mod conditional;
#[cfg(feature = "console")]
pub mod console;
pub mod delegating;
pub mod dispose_delegating;
pub mod filtering;
pub mod json_file;
pub mod secondary_logger;

pub use aggregate::AggregateSink;
pub use conditional::{ConditionalSink, RestrictedSink};
#[cfg(feature = "console")]
pub use console::ConsoleSink;
pub use delegating::{DelegatingSink, MemorySink};
pub use dispose_delegating::DisposeDelegatingSink;
pub use filtering::FilteringSink;
pub use json_file::JsonFileSink;
pub use secondary_logger::SecondaryLoggerSink;

pub use crate::core::LogEventSink;
