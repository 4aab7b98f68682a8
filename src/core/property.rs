//! Named log event properties

use super::error::{LoggerError, Result};
use super::property_value::PropertyValue;

/// A `(name, value)` pair attached to a log event
///
/// Names are validated on construction; see [`LogEventProperty::is_valid_name`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogEventProperty {
    name: String,
    value: PropertyValue,
}

/// Alias kept for callers that think in terms of detached event properties
pub type EventProperty = LogEventProperty;

impl LogEventProperty {
    /// Create a property, failing with `InvalidPropertyName` for a malformed name
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Result<Self> {
        let name = name.into();
        if !Self::is_valid_name(&name) {
            return Err(LoggerError::invalid_property_name(name));
        }
        Ok(Self {
            name,
            value: value.into(),
        })
    }

    /// Property names are non-empty runs of letters, digits, `_` and `.`,
    /// and do not start or end with `.`.
    ///
    /// All-digit names are valid; positional template holes bind to them.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && !name.starts_with('.')
            && !name.ends_with('.')
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn into_parts(self) -> (String, PropertyValue) {
        (self.name, self.value)
    }
}
