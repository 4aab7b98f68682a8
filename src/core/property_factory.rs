//! Converting host values into event properties
//!
//! Host values enter the pipeline through `serde::Serialize` and are captured
//! as `serde_json::Value`. [`PropertyValueFactory`] turns a captured value
//! into a [`PropertyValue`], optionally destructuring objects into
//! [`StructureValue`]s. [`PropertyBinder`] matches the arguments of a log
//! call against the holes of its message template.

use super::error::Result;
use super::message_template::{Destructuring, MessageTemplate};
use super::property::LogEventProperty;
use super::property_value::{
    DictionaryValue, PropertyValue, ScalarValue, SequenceValue, StructureValue,
};
use crate::self_log;
use serde::Serialize;

/// Object member that becomes the type tag of a destructured structure
pub const TYPE_TAG_MEMBER: &str = "$type";

/// Default limit on how deep nested values are converted
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Creates properties from captured host values
pub trait LogEventPropertyFactory {
    /// Fails with `InvalidPropertyName` if `name` is not a valid property name
    fn create_property(
        &self,
        name: &str,
        value: &serde_json::Value,
        destructure: bool,
    ) -> Result<LogEventProperty>;
}

/// Capture any serializable value
///
/// A value that fails to serialize is captured as a descriptive string and
/// the failure is reported to `SelfLog`.
pub fn capture_value<T: Serialize + ?Sized>(value: &T) -> serde_json::Value {
    match serde_json::to_value(value) {
        Ok(value) => value,
        Err(e) => {
            self_log!("Failed to capture value of type {}: {}", std::any::type_name::<T>(), e);
            serde_json::Value::String(format!("<unserializable: {}>", e))
        }
    }
}

/// Default value factory
#[derive(Debug, Clone)]
pub struct PropertyValueFactory {
    max_depth: usize,
}

impl PropertyValueFactory {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Values nested deeper than `max_depth` are captured as null
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Convert a captured value
    ///
    /// Arrays always become sequences. Objects become structures when
    /// `destructure` is set (or a dictionary if a key is not a valid
    /// property name); otherwise they are kept as a scalar of their JSON
    /// text.
    pub fn create_value(&self, value: &serde_json::Value, destructure: bool) -> PropertyValue {
        self.convert(value, destructure, 0)
    }

    /// Convert a captured value into its string representation
    pub fn stringify(&self, value: &serde_json::Value) -> PropertyValue {
        match value {
            serde_json::Value::String(s) => PropertyValue::from(s.as_str()),
            other => PropertyValue::from(other.to_string()),
        }
    }

    fn convert(&self, value: &serde_json::Value, destructure: bool, depth: usize) -> PropertyValue {
        if depth > self.max_depth {
            return PropertyValue::null();
        }

        match value {
            serde_json::Value::Null => PropertyValue::null(),
            serde_json::Value::Bool(b) => PropertyValue::from(*b),
            serde_json::Value::Number(n) => PropertyValue::Scalar(number_to_scalar(n)),
            serde_json::Value::String(s) => PropertyValue::from(s.as_str()),
            serde_json::Value::Array(items) => SequenceValue::new(
                items
                    .iter()
                    .map(|item| self.convert(item, destructure, depth + 1))
                    .collect(),
            )
            .into(),
            serde_json::Value::Object(members) if destructure => {
                self.destructure_object(members, depth)
            }
            serde_json::Value::Object(_) => PropertyValue::from(value.to_string()),
        }
    }

    fn destructure_object(
        &self,
        members: &serde_json::Map<String, serde_json::Value>,
        depth: usize,
    ) -> PropertyValue {
        let type_tag = members
            .get(TYPE_TAG_MEMBER)
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        let fields = members.iter().filter(|(key, _)| key.as_str() != TYPE_TAG_MEMBER);

        if members
            .keys()
            .filter(|key| key.as_str() != TYPE_TAG_MEMBER)
            .all(|key| LogEventProperty::is_valid_name(key))
        {
            let properties = fields
                .filter_map(|(key, member)| {
                    LogEventProperty::new(key.as_str(), self.convert(member, true, depth + 1)).ok()
                })
                .collect();
            StructureValue::new(type_tag, properties).into()
        } else {
            let elements = fields
                .map(|(key, member)| {
                    (
                        ScalarValue::from(key.as_str()),
                        self.convert(member, true, depth + 1),
                    )
                })
                .collect();
            DictionaryValue::new(elements).into()
        }
    }
}

impl Default for PropertyValueFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventPropertyFactory for PropertyValueFactory {
    fn create_property(
        &self,
        name: &str,
        value: &serde_json::Value,
        destructure: bool,
    ) -> Result<LogEventProperty> {
        LogEventProperty::new(name, self.create_value(value, destructure))
    }
}

fn number_to_scalar(n: &serde_json::Number) -> ScalarValue {
    if let Some(i) = n.as_i64() {
        ScalarValue::Int(i)
    } else if let Some(u) = n.as_u64() {
        ScalarValue::UInt(u)
    } else {
        ScalarValue::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Binds log call arguments to message template holes
pub struct PropertyBinder<'a> {
    factory: &'a PropertyValueFactory,
}

impl<'a> PropertyBinder<'a> {
    pub fn new(factory: &'a PropertyValueFactory) -> Self {
        Self { factory }
    }

    /// Produce one property per bound hole
    ///
    /// Positional templates (`{0}`, `{1}`) bind by index; named templates
    /// bind in order of appearance. A name appearing twice binds once.
    /// Missing or surplus arguments are reported to `SelfLog`; the event is
    /// still produced with whatever could be bound.
    pub fn bind(
        &self,
        template: &MessageTemplate,
        args: &[serde_json::Value],
    ) -> Vec<LogEventProperty> {
        let mut properties: Vec<LogEventProperty> = Vec::new();
        let mut push = |property: LogEventProperty| {
            if !properties.iter().any(|p| p.name() == property.name()) {
                properties.push(property);
            }
        };

        if template.property_tokens().next().is_none() {
            if !args.is_empty() {
                self_log!(
                    "Template \"{}\" has no properties but {} argument(s) were supplied",
                    template.text(),
                    args.len()
                );
            }
            return Vec::new();
        }

        if template.is_positional() {
            let mut used = vec![false; args.len()];
            for token in template.property_tokens() {
                let Some(position) = token.position() else {
                    continue;
                };
                match args.get(position) {
                    Some(arg) => {
                        used[position] = true;
                        if let Some(property) = self.bind_one(token.name(), token.destructuring(), arg) {
                            push(property);
                        }
                    }
                    None => self_log!(
                        "Positional argument {} is missing for template \"{}\"",
                        position,
                        template.text()
                    ),
                }
            }
            let unused = used.iter().filter(|u| !**u).count();
            if unused > 0 {
                self_log!(
                    "{} positional argument(s) unused by template \"{}\"",
                    unused,
                    template.text()
                );
            }
        } else {
            let tokens: Vec<_> = template.property_tokens().collect();
            for (token, arg) in tokens.iter().zip(args) {
                if let Some(property) = self.bind_one(token.name(), token.destructuring(), arg) {
                    push(property);
                }
            }
            if tokens.len() != args.len() {
                self_log!(
                    "Template \"{}\" has {} named hole(s) but {} argument(s) were supplied",
                    template.text(),
                    tokens.len(),
                    args.len()
                );
            }
        }

        properties
    }

    fn bind_one(
        &self,
        name: &str,
        destructuring: Destructuring,
        arg: &serde_json::Value,
    ) -> Option<LogEventProperty> {
        let value = match destructuring {
            Destructuring::Default => self.factory.create_value(arg, false),
            Destructuring::Destructure => self.factory.create_value(arg, true),
            Destructuring::Stringify => self.factory.stringify(arg),
        };
        LogEventProperty::new(name, value).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;
    use serde_json::json;

    #[derive(Serialize)]
    struct Order {
        id: u32,
        items: Vec<&'static str>,
    }

    #[test]
    fn test_scalars() {
        let factory = PropertyValueFactory::new();
        assert_eq!(factory.create_value(&json!(42), false), PropertyValue::from(42i64));
        assert_eq!(factory.create_value(&json!(u64::MAX), false), PropertyValue::from(u64::MAX));
        assert_eq!(factory.create_value(&json!(1.5), false), PropertyValue::from(1.5));
        assert_eq!(factory.create_value(&json!("x"), false), PropertyValue::from("x"));
        assert_eq!(factory.create_value(&json!(null), false), PropertyValue::null());
    }

    #[test]
    fn test_objects_opaque_without_destructuring() {
        let factory = PropertyValueFactory::new();
        let value = factory.create_value(&capture_value(&Order { id: 7, items: vec!["a"] }), false);
        assert_eq!(value.render_to_string(), r#"{"id":7,"items":["a"]}"#);
    }

    #[test]
    fn test_destructuring_builds_structure() {
        let factory = PropertyValueFactory::new();
        let value = factory.create_value(&capture_value(&Order { id: 7, items: vec!["a", "b"] }), true);
        assert!(matches!(value, PropertyValue::Structure(_)));
        assert_eq!(value.render_to_string(), "{ id: 7, items: [a, b] }");
    }

    #[test]
    fn test_type_tag_member() {
        let factory = PropertyValueFactory::new();
        let value = factory.create_value(&json!({"$type": "Point", "x": 1}), true);
        assert_eq!(value.render_to_string(), "Point { x: 1 }");
    }

    #[test]
    fn test_invalid_member_names_fall_back_to_dictionary() {
        let factory = PropertyValueFactory::new();
        let value = factory.create_value(&json!({"first name": "Ada"}), true);
        assert_eq!(value.render_to_string(), "[(first name: Ada)]");
    }

    #[test]
    fn test_max_depth() {
        let factory = PropertyValueFactory::new().with_max_depth(1);
        let value = factory.create_value(&json!([[[1]]]), false);
        assert_eq!(value.render_to_string(), "[[null]]");
    }

    #[test]
    fn test_create_property_validates_name() {
        let factory = PropertyValueFactory::new();
        let err = factory.create_property("", &json!(1), false).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidPropertyName { .. }));
        let property = factory.create_property("Count", &json!(3), false).unwrap();
        assert_eq!(property.value().render_to_string(), "3");
    }

    #[test]
    fn test_bind_named() {
        let factory = PropertyValueFactory::new();
        let template = MessageTemplate::parse("{User} bought {@Order} for {$Price}");
        let properties = PropertyBinder::new(&factory).bind(
            &template,
            &[json!("ada"), json!({"id": 1}), json!(9.5)],
        );
        let rendered: Vec<_> = properties
            .iter()
            .map(|p| (p.name(), p.value().render_to_string()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("User", "ada".to_string()),
                ("Order", "{ id: 1 }".to_string()),
                ("Price", "9.5".to_string()),
            ]
        );
        assert!(matches!(properties[2].value().as_scalar(), Some(ScalarValue::String(_))));
    }

    #[test]
    fn test_bind_positional() {
        let factory = PropertyValueFactory::new();
        let template = MessageTemplate::parse("{1} before {0} and {1} again");
        let properties = PropertyBinder::new(&factory).bind(&template, &[json!("a"), json!("b")]);
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].name(), "1");
        assert_eq!(properties[0].value().render_to_string(), "b");
    }

    #[test]
    fn test_bind_reports_mismatch() {
        let factory = PropertyValueFactory::new();
        let (_guard, lines) = crate::core::self_log::capture();

        let template = MessageTemplate::parse("{A} {B}");
        let properties = PropertyBinder::new(&factory).bind(&template, &[json!(1)]);
        crate::core::SelfLog::disable();

        assert_eq!(properties.len(), 1);
        let lines = lines.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("2 named hole(s) but 1 argument(s)"));
    }
}
