//! Core pipeline types and traits

pub mod configuration;
pub mod dispose;
pub mod enricher;
pub mod error;
pub mod filter;
pub mod level_override;
pub mod level_switch;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod message_template;
pub mod output_format;
pub mod property;
pub mod property_factory;
pub mod property_value;
pub mod self_log;
pub mod settings;
pub mod sink;

pub use configuration::LoggerConfiguration;
pub use dispose::Dispose;
pub(crate) use dispose::dispose_optional;
pub use enricher::LogEventEnricher;
pub(crate) use enricher::enrich_guarded;
pub use error::{AggregateSinkError, LoggerError, Result};
pub use filter::{
    source_context, source_matches, ByExcluding, ByIncludingOnly, EventPredicate,
    LogEventFilter, Matching, SOURCE_CONTEXT_PROPERTY,
};
pub(crate) use filter::evaluate_guarded;
pub use level_override::{LevelOverrideMap, MinimumLevel};
pub use level_switch::LoggingLevelSwitch;
pub use log_event::LogEvent;
pub use log_level::LogEventLevel;
pub use logger::Logger;
pub use message_template::{
    Destructuring, MessageTemplate, MessageTemplateToken, PropertyMap, PropertyToken,
};
pub use output_format::{OutputFormat, TimestampFormat};
pub(crate) use output_format::{format_text, sanitize};
pub use property::{EventProperty, LogEventProperty};
pub use property_factory::{
    capture_value, LogEventPropertyFactory, PropertyBinder, PropertyValueFactory,
    DEFAULT_MAX_DEPTH, TYPE_TAG_MEMBER,
};
pub use property_value::{
    DictionaryValue, PropertyValue, ScalarValue, SequenceValue, StructureValue, ValueFormatter,
    JSON_FORMAT,
};
pub use self_log::SelfLog;
pub use settings::{LoggerSettings, MinimumLevelSettings};
pub use sink::LogEventSink;
pub(crate) use sink::emit_guarded;
