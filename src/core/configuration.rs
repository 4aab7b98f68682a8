//! Fluent logger configuration

use super::enricher::LogEventEnricher;
use super::error::{LoggerError, Result};
use super::filter::LogEventFilter;
use super::level_override::{LevelOverrideMap, MinimumLevel};
use super::level_switch::LoggingLevelSwitch;
use super::log_event::LogEvent;
use super::log_level::LogEventLevel;
use super::logger::Logger;
use super::property_factory::{PropertyValueFactory, DEFAULT_MAX_DEPTH};
use super::settings::{LoggerSettings, MinimumLevelSettings};
use super::sink::LogEventSink;
use crate::enrichers::{ConditionalEnricher, PropertyEnricher, SafeAggregateEnricher};
use crate::sinks::{
    AggregateSink, ConditionalSink, FilteringSink, RestrictedSink, SecondaryLoggerSink,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builder for [`Logger`]
///
/// Errors raised while configuring (an invalid property name, an unknown
/// level switch) are kept and returned by [`create_logger`](Self::create_logger),
/// so calls can be chained without checking each step.
///
/// # Example
///
/// ```
/// use structured_logger::prelude::*;
/// use std::sync::Arc;
///
/// let switch = LoggingLevelSwitch::new(LogEventLevel::Warning);
/// let logger = LoggerConfiguration::new()
///     .minimum_level(LogEventLevel::Debug)
///     .minimum_level_override("my_app::db", LogEventLevel::Error)
///     .enrich_with_property("Application", "billing", false)
///     .enrich_with(Arc::new(ThreadEnricher::new()))
///     .write_to(Arc::new(MemorySink::new()))
///     .write_to_switched(Arc::new(MemorySink::new()), switch.clone())
///     .create_logger()
///     .unwrap();
/// ```
pub struct LoggerConfiguration {
    minimum_level: MinimumLevel,
    overrides: LevelOverrideMap,
    enrichers: Vec<Arc<dyn LogEventEnricher>>,
    filters: Vec<Arc<dyn LogEventFilter>>,
    sinks: Vec<Arc<dyn LogEventSink>>,
    audit_sinks: Vec<Arc<dyn LogEventSink>>,
    declared_switches: BTreeMap<String, LoggingLevelSwitch>,
    max_depth: usize,
    errors: Vec<LoggerError>,
}

impl LoggerConfiguration {
    pub fn new() -> Self {
        Self {
            minimum_level: MinimumLevel::default(),
            overrides: LevelOverrideMap::new(),
            enrichers: Vec::new(),
            filters: Vec::new(),
            sinks: Vec::new(),
            audit_sinks: Vec::new(),
            declared_switches: BTreeMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            errors: Vec::new(),
        }
    }

    /// Set a fixed minimum level (default `Information`)
    #[must_use = "builder methods return a new value"]
    pub fn minimum_level(mut self, level: LogEventLevel) -> Self {
        self.minimum_level = MinimumLevel::Fixed(level);
        self
    }

    /// Read the minimum level from `switch` on every call
    #[must_use = "builder methods return a new value"]
    pub fn minimum_level_controlled_by(mut self, switch: LoggingLevelSwitch) -> Self {
        self.minimum_level = MinimumLevel::Switch(switch);
        self
    }

    /// Use `level` for loggers whose source starts with `prefix`
    #[must_use = "builder methods return a new value"]
    pub fn minimum_level_override(self, prefix: impl Into<String>, level: LogEventLevel) -> Self {
        self.minimum_level_override_switch(prefix, LoggingLevelSwitch::new(level))
    }

    #[must_use = "builder methods return a new value"]
    pub fn minimum_level_override_switch(
        mut self,
        prefix: impl Into<String>,
        switch: LoggingLevelSwitch,
    ) -> Self {
        let prefix = prefix.into();
        if prefix.is_empty() {
            self.errors.push(LoggerError::config(
                "minimum_level_override",
                "override prefix must not be empty",
            ));
        } else {
            self.overrides.insert(prefix, switch);
        }
        self
    }

    /// Run `enricher` on every event, after previously added enrichers
    #[must_use = "builder methods return a new value"]
    pub fn enrich_with(mut self, enricher: Arc<dyn LogEventEnricher>) -> Self {
        self.enrichers.push(enricher);
        self
    }

    /// Attach a property to every event that does not already carry it
    #[must_use = "builder methods return a new value"]
    pub fn enrich_with_property<T: Serialize + ?Sized>(
        mut self,
        name: &str,
        value: &T,
        destructure: bool,
    ) -> Self {
        match PropertyEnricher::new(name, value, destructure) {
            Ok(enricher) => self.enrichers.push(Arc::new(enricher)),
            Err(e) => self.errors.push(e),
        }
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enrich_when<F>(mut self, condition: F, enricher: Arc<dyn LogEventEnricher>) -> Self
    where
        F: Fn(&LogEvent) -> bool + Send + Sync + 'static,
    {
        self.enrichers
            .push(Arc::new(ConditionalEnricher::new(enricher, condition)));
        self
    }

    /// Enrich only events at or above the switch's minimum level
    #[must_use = "builder methods return a new value"]
    pub fn enrich_at_level(
        mut self,
        switch: LoggingLevelSwitch,
        enricher: Arc<dyn LogEventEnricher>,
    ) -> Self {
        self.enrichers
            .push(Arc::new(ConditionalEnricher::at_level(enricher, switch)));
        self
    }

    /// Drop events the filter rejects before they reach any sink
    #[must_use = "builder methods return a new value"]
    pub fn filter<F: LogEventFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Limit how deep destructured values are captured
    #[must_use = "builder methods return a new value"]
    pub fn destructure_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Add a sink; its failures are reported to `SelfLog` and never returned
    #[must_use = "builder methods return a new value"]
    pub fn write_to(mut self, sink: Arc<dyn LogEventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn write_to_restricted(self, sink: Arc<dyn LogEventSink>, level: LogEventLevel) -> Self {
        self.write_to_switched(sink, LoggingLevelSwitch::new(level))
    }

    /// Add a sink gated by a shared level switch
    #[must_use = "builder methods return a new value"]
    pub fn write_to_switched(self, sink: Arc<dyn LogEventSink>, switch: LoggingLevelSwitch) -> Self {
        self.write_to(Arc::new(RestrictedSink::new(sink, switch)))
    }

    #[must_use = "builder methods return a new value"]
    pub fn write_to_when<F>(self, condition: F, sink: Arc<dyn LogEventSink>) -> Self
    where
        F: Fn(&LogEvent) -> bool + Send + Sync + 'static,
    {
        self.write_to(Arc::new(ConditionalSink::new(sink, condition)))
    }

    /// Forward events to another logger's pipeline
    #[must_use = "builder methods return a new value"]
    pub fn write_to_logger(self, logger: Logger, attempt_dispose: bool) -> Self {
        self.write_to(Arc::new(SecondaryLoggerSink::with_dispose(
            logger,
            attempt_dispose,
        )))
    }

    /// Add a sink whose failures are returned to the caller of the log method
    #[must_use = "builder methods return a new value"]
    pub fn audit_to(mut self, sink: Arc<dyn LogEventSink>) -> Self {
        self.audit_sinks.push(sink);
        self
    }

    /// Replay deserialized settings through the builder methods
    ///
    /// Level switches declared in the settings are created first and can be
    /// fetched afterwards with [`declared_switch`](Self::declared_switch).
    #[must_use = "builder methods return a new value"]
    pub fn apply_settings(mut self, settings: &LoggerSettings) -> Self {
        for (name, initial) in &settings.level_switches {
            if !LoggerSettings::is_valid_switch_name(name) {
                self.errors.push(LoggerError::config(
                    "level_switches",
                    format!(
                        "'{}' is not a valid level switch name; names start with a letter or '$'",
                        name
                    ),
                ));
                continue;
            }
            let switch = LoggingLevelSwitch::new(initial.unwrap_or_default());
            self.declared_switches.insert(name.clone(), switch);
        }

        match &settings.minimum_level {
            None => {}
            Some(MinimumLevelSettings::Level(level)) => {
                self = self.minimum_level_controlled_by(LoggingLevelSwitch::new(*level));
            }
            Some(MinimumLevelSettings::Detailed {
                default,
                controlled_by,
                overrides,
            }) => {
                if let Some(level) = default {
                    self = self.minimum_level_controlled_by(LoggingLevelSwitch::new(*level));
                }
                if let Some(name) = controlled_by {
                    match self.lookup_switch("minimum_level.controlled_by", name) {
                        Ok(switch) => self = self.minimum_level_controlled_by(switch),
                        Err(e) => self.errors.push(e),
                    }
                }
                for (prefix, value) in overrides {
                    match value.parse::<LogEventLevel>() {
                        Ok(level) => self = self.minimum_level_override(prefix.clone(), level),
                        Err(_) => match self.lookup_switch("minimum_level.override", value) {
                            Ok(switch) => {
                                self = self.minimum_level_override_switch(prefix.clone(), switch)
                            }
                            Err(e) => self.errors.push(e),
                        },
                    }
                }
            }
        }

        for (name, value) in &settings.properties {
            self = self.enrich_with_property(name, value, false);
        }
        self
    }

    /// A level switch declared through [`apply_settings`](Self::apply_settings)
    pub fn declared_switch(&self, name: &str) -> Option<LoggingLevelSwitch> {
        self.declared_switches.get(name).cloned()
    }

    fn lookup_switch(&self, component: &str, name: &str) -> Result<LoggingLevelSwitch> {
        self.declared_switch(name).ok_or_else(|| {
            LoggerError::config(
                component,
                format!("no level switch named '{}' has been declared", name),
            )
        })
    }

    /// Build the logger, or return the first configuration error
    pub fn create_logger(self) -> Result<Logger> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let enricher: Option<Arc<dyn LogEventEnricher>> = if self.enrichers.is_empty() {
            None
        } else {
            Some(Arc::new(SafeAggregateEnricher::new(self.enrichers)?))
        };

        let auditing = !self.audit_sinks.is_empty();
        let mut sink: Arc<dyn LogEventSink> = Arc::new(AggregateSink::swallowing(self.sinks));
        if auditing {
            let mut audited = vec![sink];
            audited.extend(self.audit_sinks);
            sink = Arc::new(AggregateSink::new(audited));
        }
        if !self.filters.is_empty() {
            sink = Arc::new(FilteringSink::new(sink, self.filters, auditing));
        }

        Ok(Logger::root(
            self.minimum_level,
            self.overrides,
            enricher,
            sink,
            PropertyValueFactory::new().with_max_depth(self.max_depth),
        ))
    }
}

impl Default for LoggerConfiguration {
    fn default() -> Self {
        Self::new()
    }
}
