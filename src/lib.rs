//! # Structured Logger
//!
//! A structured logging core: every log call becomes a typed [`LogEvent`]
//! that is enriched with contextual properties and routed through a
//! composable tree of filters and sinks.
//!
//! ## Features
//!
//! - **Message templates**: `"User {UserId} signed in"` keeps `UserId` as a
//!   typed property instead of flattening it into text
//! - **Enrichers**: fixed, conditional and context-scoped properties,
//!   isolated so one failing enricher never blocks the rest
//! - **Composable sinks**: fan-out, filtering, level restriction and
//!   forwarding into secondary loggers
//! - **Dynamic levels**: shared level switches and per-source overrides
//!   that take effect on the very next event
//! - **Self-diagnostics**: pipeline failures go to [`SelfLog`], never back
//!   into the pipeline
//!
//! ## Quick start
//!
//! ```
//! use structured_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemorySink::new());
//! let logger = LoggerConfiguration::new()
//!     .minimum_level(LogEventLevel::Debug)
//!     .enrich_with_property("Application", "billing", false)
//!     .write_to(memory.clone())
//!     .create_logger()
//!     .unwrap();
//!
//! let orders = logger.for_source("billing::orders");
//! information!(orders, "Order {OrderId} placed for {Amount}", 1042, 99.5).unwrap();
//!
//! let event = &memory.events()[0];
//! assert_eq!(event.render_message(), "Order 1042 placed for 99.5");
//! assert!(event.contains_property("Application"));
//! ```

pub mod core;
pub mod enrichers;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        capture_value, Dispose, LogEvent, LogEventEnricher, LogEventFilter, LogEventLevel,
        LogEventProperty, LogEventSink, Logger, LoggerConfiguration, LoggerError, LoggerSettings,
        LoggingLevelSwitch, Matching, MessageTemplate, OutputFormat, PropertyValue, Result,
        ScalarValue, SelfLog, TimestampFormat,
    };
    pub use crate::enrichers::{
        ConditionalEnricher, FixedPropertyEnricher, LogContext, LogContextEnricher,
        PropertyEnricher, SafeAggregateEnricher, ThreadEnricher,
    };
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    pub use crate::sinks::{
        AggregateSink, ConditionalSink, DelegatingSink, DisposeDelegatingSink, FilteringSink,
        JsonFileSink, MemorySink, RestrictedSink, SecondaryLoggerSink,
    };
    pub use crate::{debug, error, fatal, information, log, verbose, warning};
}

pub use core::{
    capture_value, AggregateSinkError, DictionaryValue, Dispose, EventProperty, LogEvent,
    LogEventEnricher, LogEventFilter, LogEventLevel, LogEventProperty, LogEventPropertyFactory,
    LogEventSink, Logger, LoggerConfiguration, LoggerError, LoggerSettings, LoggingLevelSwitch,
    MessageTemplate, OutputFormat, PropertyValue, PropertyValueFactory, Result, ScalarValue,
    SelfLog, SequenceValue, StructureValue, TimestampFormat,
};
