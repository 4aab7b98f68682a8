//! Log event structure

use super::error::Result;
use super::log_level::LogEventLevel;
use super::message_template::{MessageTemplate, PropertyMap};
use super::property::LogEventProperty;
use super::property_value::PropertyValue;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::sync::Arc;

/// A single log event: timestamp, level, message template and properties
///
/// Created once per log call, mutated only by enrichers while it travels
/// through the pipeline, and handed to sinks by shared reference.
#[derive(Debug, Clone)]
pub struct LogEvent {
    timestamp: DateTime<Utc>,
    level: LogEventLevel,
    exception: Option<String>,
    message_template: Arc<MessageTemplate>,
    properties: PropertyMap,
}

impl LogEvent {
    /// Create an event; when two properties share a name the later one wins
    pub fn new(
        timestamp: DateTime<Utc>,
        level: LogEventLevel,
        exception: Option<String>,
        message_template: impl Into<Arc<MessageTemplate>>,
        properties: impl IntoIterator<Item = LogEventProperty>,
    ) -> Self {
        Self {
            timestamp,
            level,
            exception,
            message_template: message_template.into(),
            properties: properties
                .into_iter()
                .map(LogEventProperty::into_parts)
                .collect(),
        }
    }

    /// Create an event stamped with the current time and no properties
    pub fn now(level: LogEventLevel, message_template: impl Into<Arc<MessageTemplate>>) -> Self {
        Self::new(Utc::now(), level, None, message_template, Vec::new())
    }

    #[must_use]
    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Add a property, replacing any existing value
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<Self> {
        self.add_or_update_property(LogEventProperty::new(name, value)?);
        Ok(self)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn level(&self) -> LogEventLevel {
        self.level
    }

    pub fn exception(&self) -> Option<&str> {
        self.exception.as_deref()
    }

    pub fn message_template(&self) -> &MessageTemplate {
        &self.message_template
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn contains_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Set a property, overwriting any existing value of the same name
    pub fn add_or_update_property(&mut self, property: LogEventProperty) {
        let (name, value) = property.into_parts();
        self.properties.insert(name, value);
    }

    /// Set a property only if no property of that name exists yet
    ///
    /// Returns `true` if the property was added. This is the enrichment
    /// contract: whoever sets a name first keeps it.
    pub fn add_property_if_absent(&mut self, property: LogEventProperty) -> bool {
        if self.properties.contains_key(property.name()) {
            return false;
        }
        let (name, value) = property.into_parts();
        self.properties.insert(name, value);
        true
    }

    pub fn remove_property_if_present(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.remove(name)
    }

    /// Deep copy of the event for hand-off to another pipeline
    ///
    /// Mutations on the copy are never visible through `self`.
    pub fn copy(&self) -> LogEvent {
        self.clone()
    }

    /// Write the message template with property values substituted
    pub fn render_message_to(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.message_template.render(&self.properties, out)
    }

    pub fn render_message(&self) -> String {
        self.message_template.render_to_string(&self.properties)
    }

    /// JSON object with `timestamp`, `level`, `template`, `message`,
    /// optional `exception` and a `properties` object
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert(
            "timestamp".to_string(),
            serde_json::Value::String(self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        obj.insert(
            "level".to_string(),
            serde_json::Value::String(self.level.to_str().to_string()),
        );
        obj.insert(
            "template".to_string(),
            serde_json::Value::String(self.message_template.text().to_string()),
        );
        obj.insert(
            "message".to_string(),
            serde_json::Value::String(self.render_message()),
        );
        if let Some(exception) = &self.exception {
            obj.insert(
                "exception".to_string(),
                serde_json::Value::String(exception.clone()),
            );
        }
        let properties = self
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json_value()))
            .collect();
        obj.insert("properties".to_string(), serde_json::Value::Object(properties));
        serde_json::Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> LogEvent {
        LogEvent::now(
            LogEventLevel::Information,
            MessageTemplate::parse("User {UserId} signed in"),
        )
    }

    #[test]
    fn test_add_property_if_absent_first_writer_wins() {
        let mut event = event();
        assert!(event.add_property_if_absent(LogEventProperty::new("x", 1).unwrap()));
        assert!(!event.add_property_if_absent(LogEventProperty::new("x", 2).unwrap()));
        assert_eq!(event.property("x"), Some(&PropertyValue::from(1)));
    }

    #[test]
    fn test_add_or_update_overwrites() {
        let mut event = event();
        event.add_or_update_property(LogEventProperty::new("x", 1).unwrap());
        event.add_or_update_property(LogEventProperty::new("x", 2).unwrap());
        assert_eq!(event.property("x"), Some(&PropertyValue::from(2)));
    }

    #[test]
    fn test_new_later_duplicate_wins() {
        let event = LogEvent::new(
            Utc::now(),
            LogEventLevel::Debug,
            None,
            MessageTemplate::empty(),
            vec![
                LogEventProperty::new("a", 1).unwrap(),
                LogEventProperty::new("a", 2).unwrap(),
            ],
        );
        assert_eq!(event.properties().len(), 1);
        assert_eq!(event.property("a"), Some(&PropertyValue::from(2)));
    }

    #[test]
    fn test_copy_is_independent() {
        let original = event().with_property("UserId", 42).unwrap();
        let mut copy = original.copy();
        copy.add_or_update_property(LogEventProperty::new("UserId", 7).unwrap());
        copy.add_property_if_absent(LogEventProperty::new("Extra", true).unwrap());

        assert_eq!(original.property("UserId"), Some(&PropertyValue::from(42)));
        assert!(!original.contains_property("Extra"));
        assert_eq!(copy.timestamp(), original.timestamp());
    }

    #[test]
    fn test_render_message() {
        let event = event().with_property("UserId", 42).unwrap();
        assert_eq!(event.render_message(), "User 42 signed in");
    }

    #[test]
    fn test_remove_property() {
        let mut event = event().with_property("a", 1).unwrap();
        assert_eq!(event.remove_property_if_present("a"), Some(PropertyValue::from(1)));
        assert_eq!(event.remove_property_if_present("a"), None);
    }

    #[test]
    fn test_json_value() {
        let event = event()
            .with_property("UserId", 42)
            .unwrap()
            .with_exception("boom");
        let json = event.to_json_value();
        assert_eq!(json["level"], "Information");
        assert_eq!(json["message"], "User 42 signed in");
        assert_eq!(json["template"], "User {UserId} signed in");
        assert_eq!(json["exception"], "boom");
        assert_eq!(json["properties"]["UserId"], 42);
    }
}
