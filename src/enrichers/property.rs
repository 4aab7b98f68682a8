//! Enrichers that attach a single property

use crate::core::{
    capture_value, LogEvent, LogEventEnricher, LogEventProperty, LogEventPropertyFactory,
    LoggerError, PropertyValue, Result,
};
use serde::Serialize;

/// Adds a property built from a host value through the property factory
///
/// The name is validated on construction; the value is captured once and
/// converted on every `enrich` call.
#[derive(Debug, Clone)]
pub struct PropertyEnricher {
    name: String,
    value: serde_json::Value,
    destructure: bool,
}

impl PropertyEnricher {
    pub fn new<T: Serialize + ?Sized>(
        name: impl Into<String>,
        value: &T,
        destructure: bool,
    ) -> Result<Self> {
        let name = name.into();
        if !LogEventProperty::is_valid_name(&name) {
            return Err(LoggerError::invalid_property_name(name));
        }
        Ok(Self {
            name,
            value: capture_value(value),
            destructure,
        })
    }

    pub fn property_name(&self) -> &str {
        &self.name
    }

    /// The value as captured at construction
    pub fn captured_value(&self) -> &serde_json::Value {
        &self.value
    }
}

impl LogEventEnricher for PropertyEnricher {
    fn enrich(&self, event: &mut LogEvent, factory: &dyn LogEventPropertyFactory) -> Result<()> {
        if event.contains_property(&self.name) {
            return Ok(());
        }
        let property = factory.create_property(&self.name, &self.value, self.destructure)?;
        event.add_property_if_absent(property);
        Ok(())
    }
}

/// Adds an already-built property, skipping the factory
#[derive(Debug, Clone)]
pub struct FixedPropertyEnricher {
    property: LogEventProperty,
}

impl FixedPropertyEnricher {
    pub fn new(property: LogEventProperty) -> Self {
        Self { property }
    }

    pub fn with(name: impl Into<String>, value: impl Into<PropertyValue>) -> Result<Self> {
        Ok(Self::new(LogEventProperty::new(name, value)?))
    }

    pub fn property(&self) -> &LogEventProperty {
        &self.property
    }
}

impl LogEventEnricher for FixedPropertyEnricher {
    fn enrich(&self, event: &mut LogEvent, _factory: &dyn LogEventPropertyFactory) -> Result<()> {
        if !event.contains_property(self.property.name()) {
            event.add_property_if_absent(self.property.clone());
        }
        Ok(())
    }
}
