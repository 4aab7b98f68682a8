//! The logger: level gating, template binding, enrichment and dispatch

use super::dispose::{dispose_optional, Dispose};
use super::enricher::{enrich_guarded, LogEventEnricher};
use super::error::Result;
use super::filter::SOURCE_CONTEXT_PROPERTY;
use super::level_override::{LevelOverrideMap, MinimumLevel};
use super::log_event::LogEvent;
use super::log_level::LogEventLevel;
use super::message_template::MessageTemplate;
use super::property::LogEventProperty;
use super::property_factory::{PropertyBinder, PropertyValueFactory};
use super::sink::LogEventSink;
use crate::enrichers::{FixedPropertyEnricher, PropertyEnricher};
use crate::self_log;
use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

const MAX_CACHED_TEMPLATES: usize = 1000;
const MAX_CACHED_TEMPLATE_LENGTH: usize = 1024;

/// Parsed templates keyed by their text
#[derive(Default)]
struct TemplateCache {
    templates: RwLock<HashMap<String, Arc<MessageTemplate>>>,
}

impl TemplateCache {
    fn parse(&self, text: &str) -> Arc<MessageTemplate> {
        if text.len() > MAX_CACHED_TEMPLATE_LENGTH {
            return Arc::new(MessageTemplate::parse(text));
        }
        if let Some(template) = self.templates.read().get(text) {
            return Arc::clone(template);
        }

        let template = Arc::new(MessageTemplate::parse(text));
        let mut templates = self.templates.write();
        if templates.len() >= MAX_CACHED_TEMPLATES {
            templates.clear();
        }
        templates.insert(text.to_string(), Arc::clone(&template));
        template
    }
}

/// Where a logger sends enriched events
enum Route {
    /// Root logger: the configured sink tree
    Sinks(Arc<dyn LogEventSink>),
    /// Child logger: the parent's pipeline, minus its level check
    Parent(Logger),
}

struct LoggerInner {
    minimum_level: MinimumLevel,
    overrides: Arc<LevelOverrideMap>,
    enricher: Option<Arc<dyn LogEventEnricher>>,
    route: Route,
    factory: Arc<PropertyValueFactory>,
    templates: Arc<TemplateCache>,
}

/// Structured logger
///
/// Cloning is cheap and yields a handle to the same pipeline. Child loggers
/// created with [`for_context`](Logger::for_context) and friends enrich
/// events with their own properties and then hand them to their parent.
///
/// # Example
///
/// ```
/// use structured_logger::prelude::*;
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemorySink::new());
/// let logger = LoggerConfiguration::new()
///     .minimum_level(LogEventLevel::Debug)
///     .write_to(memory.clone())
///     .create_logger()
///     .unwrap();
///
/// information!(logger, "User {UserId} signed in", 42).unwrap();
/// assert_eq!(memory.messages(), vec!["User 42 signed in".to_string()]);
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    pub(crate) fn root(
        minimum_level: MinimumLevel,
        overrides: LevelOverrideMap,
        enricher: Option<Arc<dyn LogEventEnricher>>,
        sink: Arc<dyn LogEventSink>,
        factory: PropertyValueFactory,
    ) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                minimum_level,
                overrides: Arc::new(overrides),
                enricher,
                route: Route::Sinks(sink),
                factory: Arc::new(factory),
                templates: Arc::new(TemplateCache::default()),
            }),
        }
    }

    /// A logger that discards everything
    pub fn none() -> Self {
        Self::root(
            MinimumLevel::Fixed(LogEventLevel::Fatal),
            LevelOverrideMap::new(),
            None,
            Arc::new(crate::sinks::AggregateSink::new(Vec::new())),
            PropertyValueFactory::new(),
        )
    }

    fn child(&self, minimum_level: MinimumLevel, enricher: Arc<dyn LogEventEnricher>) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                minimum_level,
                overrides: Arc::clone(&self.inner.overrides),
                enricher: Some(enricher),
                route: Route::Parent(self.clone()),
                factory: Arc::clone(&self.inner.factory),
                templates: Arc::clone(&self.inner.templates),
            }),
        }
    }

    /// Current minimum level of this logger
    #[inline]
    pub fn minimum_level(&self) -> LogEventLevel {
        self.inner.minimum_level.current()
    }

    #[inline]
    pub fn is_enabled(&self, level: LogEventLevel) -> bool {
        level >= self.minimum_level()
    }

    /// Child logger that adds `name` to every event it writes
    ///
    /// Binding `SourceContext` also applies any matching level override.
    pub fn for_context<T: Serialize + ?Sized>(
        &self,
        name: &str,
        value: &T,
        destructure: bool,
    ) -> Result<Logger> {
        let enricher = PropertyEnricher::new(name, value, destructure)?;

        let minimum_level = match (name, enricher.captured_value()) {
            (SOURCE_CONTEXT_PROPERTY, serde_json::Value::String(source)) => self
                .inner
                .overrides
                .effective(source, &self.inner.minimum_level),
            _ => self.inner.minimum_level.clone(),
        };
        Ok(self.child(minimum_level, Arc::new(enricher)))
    }

    /// Child logger that runs `enricher` on every event it writes
    pub fn for_enricher(&self, enricher: Arc<dyn LogEventEnricher>) -> Logger {
        self.child(self.inner.minimum_level.clone(), enricher)
    }

    /// Child logger tagged with `SourceContext = source`
    pub fn for_source(&self, source: &str) -> Logger {
        let minimum_level = self
            .inner
            .overrides
            .effective(source, &self.inner.minimum_level);
        let property = LogEventProperty::new(SOURCE_CONTEXT_PROPERTY, source);
        match property {
            Ok(property) => self.child(minimum_level, Arc::new(FixedPropertyEnricher::new(property))),
            // `SourceContext` is a valid name, so this arm is unreachable
            Err(_) => self.clone(),
        }
    }

    /// Child logger tagged with the type path of `T`
    pub fn for_type<T: ?Sized>(&self) -> Logger {
        self.for_source(std::any::type_name::<T>())
    }

    /// Write an already-built event if its level is enabled
    pub fn write_event(&self, mut event: LogEvent) -> Result<()> {
        if !self.is_enabled(event.level()) {
            return Ok(());
        }
        self.dispatch(&mut event)
    }

    /// Bind `args` to `template` and write the resulting event
    pub fn write(
        &self,
        level: LogEventLevel,
        template: &str,
        args: &[serde_json::Value],
    ) -> Result<()> {
        self.write_inner(level, None, template, args)
    }

    /// Like [`write`](Logger::write), attaching `error` and its source chain
    pub fn write_with_error(
        &self,
        level: LogEventLevel,
        error: &(dyn std::error::Error + 'static),
        template: &str,
        args: &[serde_json::Value],
    ) -> Result<()> {
        self.write_inner(level, Some(describe_error(error)), template, args)
    }

    fn write_inner(
        &self,
        level: LogEventLevel,
        exception: Option<String>,
        template: &str,
        args: &[serde_json::Value],
    ) -> Result<()> {
        if !self.is_enabled(level) {
            return Ok(());
        }

        let template = self.inner.templates.parse(template);
        let properties = PropertyBinder::new(&self.inner.factory).bind(&template, args);
        let mut event = LogEvent::new(Utc::now(), level, exception, template, properties);
        self.dispatch(&mut event)
    }

    fn dispatch(&self, event: &mut LogEvent) -> Result<()> {
        if let Some(enricher) = &self.inner.enricher {
            if let Err(e) = enrich_guarded(enricher.as_ref(), event, self.inner.factory.as_ref()) {
                self_log!(
                    "Exception caught while enriching event \"{}\" with {}: {}",
                    event.message_template(),
                    enricher.name(),
                    e
                );
            }
        }

        match &self.inner.route {
            Route::Sinks(sink) => sink.emit(event),
            Route::Parent(parent) => parent.dispatch(event),
        }
    }

    pub fn verbose(&self, template: &str, args: &[serde_json::Value]) -> Result<()> {
        self.write(LogEventLevel::Verbose, template, args)
    }

    pub fn debug(&self, template: &str, args: &[serde_json::Value]) -> Result<()> {
        self.write(LogEventLevel::Debug, template, args)
    }

    pub fn information(&self, template: &str, args: &[serde_json::Value]) -> Result<()> {
        self.write(LogEventLevel::Information, template, args)
    }

    pub fn warning(&self, template: &str, args: &[serde_json::Value]) -> Result<()> {
        self.write(LogEventLevel::Warning, template, args)
    }

    pub fn error(&self, template: &str, args: &[serde_json::Value]) -> Result<()> {
        self.write(LogEventLevel::Error, template, args)
    }

    pub fn fatal(&self, template: &str, args: &[serde_json::Value]) -> Result<()> {
        self.write(LogEventLevel::Fatal, template, args)
    }

    /// Flush the sink tree
    pub fn flush(&self) -> Result<()> {
        match &self.inner.route {
            Route::Sinks(sink) => sink.flush(),
            Route::Parent(parent) => parent.flush(),
        }
    }

    /// Release resources held by sinks and enrichers
    ///
    /// Only a root logger owns its sinks; disposing a child logger releases
    /// its own enricher and leaves the parent untouched.
    pub fn dispose(&self) -> Result<()> {
        let enricher_result = match &self.inner.enricher {
            Some(enricher) => dispose_optional(enricher.as_dispose()),
            None => Ok(()),
        };
        let sink_result = match &self.inner.route {
            Route::Sinks(sink) => dispose_optional(sink.as_dispose()),
            Route::Parent(_) => Ok(()),
        };
        sink_result.and(enricher_result)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("minimum_level", &self.minimum_level())
            .field("child", &matches!(self.inner.route, Route::Parent(_)))
            .finish()
    }
}

/// A logger used as a sink dispatches without its own level check
impl LogEventSink for Logger {
    fn emit(&self, event: &LogEvent) -> Result<()> {
        let mut copy = event.copy();
        self.dispatch(&mut copy)
    }

    fn flush(&self) -> Result<()> {
        Logger::flush(self)
    }

    fn name(&self) -> &str {
        "logger"
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        Some(self)
    }
}

impl Dispose for Logger {
    fn dispose(&self) -> Result<()> {
        Logger::dispose(self)
    }
}

fn describe_error(error: &(dyn std::error::Error + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str("\nCaused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
