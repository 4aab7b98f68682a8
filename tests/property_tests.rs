//! Property-based tests for the event model
//!
//! These tests verify:
//! - Property name validation and accessor round-trips
//! - Deterministic rendering of property values
//! - Level ordering and parsing
//! - First-writer-wins enrichment
//! - Single-line text output for arbitrary input
//! - Template rendering never panics, whatever the holes ask for

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use structured_logger::core::PropertyMap;
use structured_logger::{
    LogEvent, LogEventLevel, LogEventProperty, LoggerError, MessageTemplate, OutputFormat,
    PropertyValue, ScalarValue, SequenceValue, TimestampFormat,
};

fn level_strategy() -> impl Strategy<Value = LogEventLevel> {
    prop_oneof![
        Just(LogEventLevel::Verbose),
        Just(LogEventLevel::Debug),
        Just(LogEventLevel::Information),
        Just(LogEventLevel::Warning),
        Just(LogEventLevel::Error),
        Just(LogEventLevel::Fatal),
    ]
}

fn scalar_strategy() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        any::<i64>().prop_map(PropertyValue::from),
        any::<bool>().prop_map(PropertyValue::from),
        (-1.0e9f64..1.0e9f64).prop_map(PropertyValue::from),
        ".*".prop_map(PropertyValue::from),
        Just(PropertyValue::Scalar(ScalarValue::Null)),
    ]
}

fn value_strategy() -> impl Strategy<Value = PropertyValue> {
    scalar_strategy().prop_recursive(3, 32, 6, |inner| {
        prop::collection::vec(inner, 0..6)
            .prop_map(|elements| PropertyValue::from(SequenceValue::new(elements)))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_valid_names_round_trip(
        name in "[A-Za-z_][A-Za-z0-9_]{0,15}(\\.[A-Za-z0-9_]{1,8}){0,2}",
        value in value_strategy(),
    ) {
        let property = LogEventProperty::new(name.clone(), value.clone()).unwrap();
        prop_assert_eq!(property.name(), name.as_str());
        prop_assert_eq!(property.value(), &value);
    }

    #[test]
    fn test_names_with_invalid_characters_rejected(
        prefix in "[A-Za-z]{0,4}",
        bad in "[ \\-{}@$:/]",
        suffix in "[A-Za-z]{0,4}",
    ) {
        let name = format!("{}{}{}", prefix, bad, suffix);
        let rejected = matches!(
            LogEventProperty::new(name, 1),
            Err(LoggerError::InvalidPropertyName { .. })
        );
        prop_assert!(rejected);
    }

    #[test]
    fn test_rendering_is_deterministic(value in value_strategy()) {
        prop_assert_eq!(value.render_to_string(), value.render_to_string());
    }

    #[test]
    fn test_sequence_rendering_brackets(values in prop::collection::vec(any::<i32>(), 0..10)) {
        let sequence: PropertyValue = values.iter().copied().collect::<SequenceValue>().into();
        let expected = format!(
            "[{}]",
            values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
        );
        prop_assert_eq!(sequence.render_to_string(), expected);
    }
}

proptest! {
    #[test]
    fn test_level_ordering_matches_discriminant(a in level_strategy(), b in level_strategy()) {
        prop_assert_eq!(a < b, (a as u8) < (b as u8));
    }

    #[test]
    fn test_level_display_parses_back(level in level_strategy(), lower in any::<bool>()) {
        let text = if lower { level.to_string().to_lowercase() } else { level.to_string() };
        prop_assert_eq!(text.parse::<LogEventLevel>(), Ok(level));
    }

    #[test]
    fn test_minimum_enables_everything(level in level_strategy()) {
        prop_assert!(level >= LogEventLevel::MINIMUM);
    }
}

proptest! {
    #[test]
    fn test_first_writer_wins(first in any::<i64>(), second in any::<i64>()) {
        let mut event = LogEvent::now(LogEventLevel::Information, MessageTemplate::empty());
        let added = event.add_property_if_absent(LogEventProperty::new("x", first).unwrap());
        let ignored = event.add_property_if_absent(LogEventProperty::new("x", second).unwrap());

        prop_assert!(added);
        prop_assert!(!ignored);
        prop_assert_eq!(event.property("x"), Some(&PropertyValue::from(first)));
    }

    #[test]
    fn test_copy_is_independent(value in ".*") {
        let original = LogEvent::now(LogEventLevel::Debug, MessageTemplate::empty());
        let mut copy = original.copy();
        copy.add_or_update_property(LogEventProperty::new("Added", value).unwrap());

        prop_assert!(!original.contains_property("Added"));
        prop_assert!(copy.contains_property("Added"));
    }

    #[test]
    fn test_text_output_is_single_line(message in "(?s).*", exception in "(?s).*") {
        let event = LogEvent::now(LogEventLevel::Error, MessageTemplate::parse("{Input}"))
            .with_property("Input", message)
            .unwrap()
            .with_exception(exception);
        let line = OutputFormat::Text.format(&event, &TimestampFormat::Iso8601);

        prop_assert!(!line.contains('\n'));
        prop_assert!(!line.contains('\r'));
    }

    #[test]
    fn test_template_render_without_holes_is_identity(text in "[^{}]*") {
        let template = MessageTemplate::parse(text.clone());
        prop_assert_eq!(template.render_to_string(&Default::default()), text);
    }
}

fn hole_properties() -> PropertyMap {
    let when: DateTime<Utc> = DateTime::from_timestamp(1_736_332_245, 0).unwrap_or_default();
    let mut properties = PropertyMap::new();
    properties.insert("S".to_string(), PropertyValue::from("text"));
    properties.insert("F".to_string(), PropertyValue::from(1.25));
    properties.insert("I".to_string(), PropertyValue::from(-42));
    properties.insert("D".to_string(), PropertyValue::from(when));
    properties
}

fn hole_strategy() -> impl Strategy<Value = String> {
    let name = prop_oneof![Just("S"), Just("F"), Just("I"), Just("D")];
    let prefix = prop_oneof![Just(""), Just("@"), Just("$")];
    let alignment = prop::option::of(any::<i64>().prop_map(|w| format!(",{}", w)));
    let format = prop::option::of("(?s).{0,8}".prop_map(|f| format!(":{}", f)));
    (prefix, name, alignment, format).prop_map(|(prefix, name, alignment, format)| {
        format!(
            "{{{}{}{}{}}}",
            prefix,
            name,
            alignment.unwrap_or_default(),
            format.unwrap_or_default()
        )
    })
}

fn template_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![hole_strategy(), "(?s).{0,6}"], 0..8)
        .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn test_arbitrary_template_renders(text in "(?s).*") {
        let template = MessageTemplate::parse(text);
        let first = template.render_to_string(&hole_properties());
        prop_assert_eq!(first, template.render_to_string(&hole_properties()));
    }

    #[test]
    fn test_adversarial_holes_render(text in template_strategy()) {
        let mut event = LogEvent::now(LogEventLevel::Information, MessageTemplate::parse(text));
        for (name, value) in hole_properties() {
            event.add_or_update_property(LogEventProperty::new(name, value).unwrap());
        }

        let _ = event.render_message();
        let line = OutputFormat::Text.format(&event, &TimestampFormat::Iso8601);
        prop_assert!(!line.contains('\n'));
    }
}
