//! Error types for the logging pipeline

use std::fmt;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Property name failed validation
    #[error("Invalid property name: '{name}'")]
    InvalidPropertyName { name: String },

    /// A sink returned an error from `emit`
    #[error("Sink '{sink}' failed: {message}")]
    Sink { sink: String, message: String },

    /// A sink panicked while emitting
    #[error("Sink '{sink}' panicked: {message}")]
    SinkPanicked { sink: String, message: String },

    /// One or more children of an aggregate sink failed
    #[error(transparent)]
    Aggregate(#[from] AggregateSinkError),

    /// Filter predicate failed while evaluating an event
    #[error("Filter evaluation failed: {message}")]
    Filter { message: String },

    /// Enricher failed while enriching an event
    #[error("Enricher '{enricher}' failed: {message}")]
    Enricher { enricher: String, message: String },

    /// The same enricher instance was registered more than once
    #[error("Enricher '{enricher}' is registered more than once")]
    DuplicateEnricher { enricher: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid property name error
    pub fn invalid_property_name(name: impl Into<String>) -> Self {
        LoggerError::InvalidPropertyName { name: name.into() }
    }

    /// Create a sink emission error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Sink {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a sink panic error
    pub fn sink_panicked(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkPanicked {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a filter error
    pub fn filter(message: impl Into<String>) -> Self {
        LoggerError::Filter {
            message: message.into(),
        }
    }

    /// Create an enricher error
    pub fn enricher(enricher: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Enricher {
            enricher: enricher.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

/// Errors collected by an aggregate sink, in the order the failing sinks
/// were invoked.
#[derive(Debug)]
pub struct AggregateSinkError {
    errors: Vec<LoggerError>,
}

impl AggregateSinkError {
    pub fn new(errors: Vec<LoggerError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[LoggerError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<LoggerError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for AggregateSinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sink(s) failed", self.errors.len())?;
        for (idx, err) in self.errors.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, err)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateSinkError {}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
