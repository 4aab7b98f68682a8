//! Property value model
//!
//! A closed set of value shapes a log event property can carry:
//! - `ScalarValue`: a single primitive
//! - `SequenceValue`: an ordered list of values
//! - `StructureValue`: a named bag of properties (a destructured object)
//! - `DictionaryValue`: ordered scalar-keyed pairs
//!
//! Every shape renders deterministically through [`PropertyValue::render`].

use super::property::LogEventProperty;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt::{self, Write};

/// Custom rendering hook for scalar values
///
/// When supplied to `render`, the formatter replaces the default
/// stringification of every scalar in the value tree.
pub trait ValueFormatter {
    fn format_scalar(
        &self,
        value: &ScalarValue,
        format: Option<&str>,
        out: &mut dyn Write,
    ) -> fmt::Result;
}

impl<F> ValueFormatter for F
where
    F: Fn(&ScalarValue, Option<&str>, &mut dyn Write) -> fmt::Result,
{
    fn format_scalar(
        &self,
        value: &ScalarValue,
        format: Option<&str>,
        out: &mut dyn Write,
    ) -> fmt::Result {
        self(value, format, out)
    }
}

/// Format hint selecting JSON-style rendering (quoted, escaped strings)
pub const JSON_FORMAT: &str = "j";

/// A single primitive value
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    String(String),
    DateTime(DateTime<Utc>),
}

impl ScalarValue {
    /// Render this scalar, delegating to `formatter` when one is supplied
    pub fn render(
        &self,
        out: &mut dyn Write,
        format: Option<&str>,
        formatter: Option<&dyn ValueFormatter>,
    ) -> fmt::Result {
        if let Some(formatter) = formatter {
            return formatter.format_scalar(self, format, out);
        }

        let json = format == Some(JSON_FORMAT);
        match self {
            ScalarValue::Null => out.write_str("null"),
            ScalarValue::Bool(b) => write!(out, "{}", b),
            ScalarValue::Int(i) => write!(out, "{}", i),
            ScalarValue::UInt(u) => write!(out, "{}", u),
            ScalarValue::Float(f) => match format.and_then(float_precision) {
                Some(precision) => write!(out, "{:.*}", precision, f),
                None => write!(out, "{}", f),
            },
            ScalarValue::Char(c) if json => write_json_string(out, c.encode_utf8(&mut [0; 4])),
            ScalarValue::Char(c) => out.write_char(*c),
            ScalarValue::String(s) if json => write_json_string(out, s),
            ScalarValue::String(s) => out.write_str(s),
            ScalarValue::DateTime(dt) => {
                let text = match format {
                    Some(pattern) if pattern.contains('%') => format_date_time(dt, pattern),
                    _ => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
                };
                if json {
                    write_json_string(out, &text)
                } else {
                    out.write_str(&text)
                }
            }
        }
    }

    /// Convert to `serde_json::Value`
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            ScalarValue::Null => serde_json::Value::Null,
            ScalarValue::Bool(b) => serde_json::Value::Bool(*b),
            ScalarValue::Int(i) => serde_json::Value::Number((*i).into()),
            ScalarValue::UInt(u) => serde_json::Value::Number((*u).into()),
            ScalarValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ScalarValue::Char(c) => serde_json::Value::String(c.to_string()),
            ScalarValue::String(s) => serde_json::Value::String(s.clone()),
            ScalarValue::DateTime(dt) => {
                serde_json::Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }

    /// Text used when a scalar is a dictionary key in JSON output
    fn to_key_string(&self) -> String {
        let mut key = String::new();
        let _ = self.render(&mut key, None, None);
        key
    }
}

/// Largest precision honored by an `F<n>` hint
const MAX_FLOAT_PRECISION: usize = 64;

/// `F2`/`f2` style precision hints for floats; out-of-range hints are ignored
fn float_precision(format: &str) -> Option<usize> {
    let digits = format.strip_prefix('F').or_else(|| format.strip_prefix('f'))?;
    digits
        .parse()
        .ok()
        .filter(|precision| *precision <= MAX_FLOAT_PRECISION)
}

/// strftime-style rendering; an unusable pattern falls back to RFC3339
fn format_date_time(dt: &DateTime<Utc>, pattern: &str) -> String {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    let fallback = || dt.to_rfc3339_opts(SecondsFormat::Millis, true);
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return fallback();
    }

    let mut text = String::new();
    match write!(text, "{}", dt.format_with_items(items.iter())) {
        Ok(()) => text,
        Err(_) => fallback(),
    }
}

fn write_json_string(out: &mut dyn Write, s: &str) -> fmt::Result {
    match serde_json::to_string(s) {
        Ok(quoted) => out.write_str(&quoted),
        Err(_) => write!(out, "\"{}\"", s),
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident as $cast:ty),* $(,)?) => {
        $(
            impl From<$ty> for ScalarValue {
                fn from(value: $ty) -> Self {
                    ScalarValue::$variant(value as $cast)
                }
            }

            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    PropertyValue::Scalar(ScalarValue::from(value))
                }
            }
        )*
    };
}

scalar_from! {
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    isize => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    usize => UInt as u64,
    f32 => Float as f64,
    f64 => Float as f64,
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Bool(b)
    }
}

impl From<char> for ScalarValue {
    fn from(c: char) -> Self {
        ScalarValue::Char(c)
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::String(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::String(s)
    }
}

impl From<DateTime<Utc>> for ScalarValue {
    fn from(dt: DateTime<Utc>) -> Self {
        ScalarValue::DateTime(dt)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ScalarValue::Null)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, None, None)
    }
}

/// Ordered list of values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SequenceValue {
    elements: Vec<PropertyValue>,
}

impl SequenceValue {
    pub fn new(elements: Vec<PropertyValue>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[PropertyValue] {
        &self.elements
    }

    pub fn render(
        &self,
        out: &mut dyn Write,
        format: Option<&str>,
        formatter: Option<&dyn ValueFormatter>,
    ) -> fmt::Result {
        out.write_char('[')?;
        for (idx, element) in self.elements.iter().enumerate() {
            if idx > 0 {
                out.write_str(", ")?;
            }
            element.render(out, format, formatter)?;
        }
        out.write_char(']')
    }
}

impl<T: Into<PropertyValue>> FromIterator<T> for SequenceValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A destructured object: an optional type tag plus named properties
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureValue {
    type_tag: Option<String>,
    properties: Vec<LogEventProperty>,
}

impl StructureValue {
    pub fn new(type_tag: Option<String>, properties: Vec<LogEventProperty>) -> Self {
        Self {
            type_tag,
            properties,
        }
    }

    pub fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    pub fn properties(&self) -> &[LogEventProperty] {
        &self.properties
    }

    pub fn render(
        &self,
        out: &mut dyn Write,
        format: Option<&str>,
        formatter: Option<&dyn ValueFormatter>,
    ) -> fmt::Result {
        if let Some(tag) = &self.type_tag {
            out.write_str(tag)?;
            out.write_char(' ')?;
        }
        out.write_str("{ ")?;
        for (idx, property) in self.properties.iter().enumerate() {
            if idx > 0 {
                out.write_str(", ")?;
            }
            out.write_str(property.name())?;
            out.write_str(": ")?;
            property.value().render(out, format, formatter)?;
        }
        if !self.properties.is_empty() {
            out.write_char(' ')?;
        }
        out.write_char('}')
    }
}

/// Ordered scalar-keyed pairs
///
/// Kept as a list rather than a map so that keys render through the scalar
/// contract and output order matches insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DictionaryValue {
    elements: Vec<(ScalarValue, PropertyValue)>,
}

impl DictionaryValue {
    pub fn new(elements: Vec<(ScalarValue, PropertyValue)>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[(ScalarValue, PropertyValue)] {
        &self.elements
    }

    pub fn render(
        &self,
        out: &mut dyn Write,
        format: Option<&str>,
        formatter: Option<&dyn ValueFormatter>,
    ) -> fmt::Result {
        out.write_char('[')?;
        for (idx, (key, value)) in self.elements.iter().enumerate() {
            if idx > 0 {
                out.write_str(", ")?;
            }
            out.write_char('(')?;
            key.render(out, format, formatter)?;
            out.write_str(": ")?;
            value.render(out, format, formatter)?;
            out.write_char(')')?;
        }
        out.write_char(']')
    }
}

/// Any value a log event property can carry
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(ScalarValue),
    Sequence(SequenceValue),
    Structure(StructureValue),
    Dictionary(DictionaryValue),
}

impl PropertyValue {
    /// Write a textual representation of the value to `out`
    ///
    /// `format` is a hint passed down to every scalar in the tree; `formatter`
    /// overrides scalar stringification entirely.
    pub fn render(
        &self,
        out: &mut dyn Write,
        format: Option<&str>,
        formatter: Option<&dyn ValueFormatter>,
    ) -> fmt::Result {
        match self {
            PropertyValue::Scalar(v) => v.render(out, format, formatter),
            PropertyValue::Sequence(v) => v.render(out, format, formatter),
            PropertyValue::Structure(v) => v.render(out, format, formatter),
            PropertyValue::Dictionary(v) => v.render(out, format, formatter),
        }
    }

    /// Render with no format hint and the default stringification
    pub fn render_to_string(&self) -> String {
        let mut text = String::new();
        // Writing into a String cannot fail.
        let _ = self.render(&mut text, None, None);
        text
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            PropertyValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn null() -> Self {
        PropertyValue::Scalar(ScalarValue::Null)
    }

    /// Convert to `serde_json::Value`
    ///
    /// Structures become objects (with a `$type` member when tagged) and
    /// dictionaries become objects keyed by the rendered key.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            PropertyValue::Scalar(v) => v.to_json_value(),
            PropertyValue::Sequence(v) => serde_json::Value::Array(
                v.elements().iter().map(PropertyValue::to_json_value).collect(),
            ),
            PropertyValue::Structure(v) => {
                let mut obj = serde_json::Map::new();
                if let Some(tag) = v.type_tag() {
                    obj.insert("$type".to_string(), serde_json::Value::String(tag.to_string()));
                }
                for property in v.properties() {
                    obj.insert(property.name().to_string(), property.value().to_json_value());
                }
                serde_json::Value::Object(obj)
            }
            PropertyValue::Dictionary(v) => {
                let mut obj = serde_json::Map::new();
                for (key, value) in v.elements() {
                    obj.insert(key.to_key_string(), value.to_json_value());
                }
                serde_json::Value::Object(obj)
            }
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, None, None)
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_value().serialize(serializer)
    }
}

impl From<ScalarValue> for PropertyValue {
    fn from(v: ScalarValue) -> Self {
        PropertyValue::Scalar(v)
    }
}

impl From<SequenceValue> for PropertyValue {
    fn from(v: SequenceValue) -> Self {
        PropertyValue::Sequence(v)
    }
}

impl From<StructureValue> for PropertyValue {
    fn from(v: StructureValue) -> Self {
        PropertyValue::Structure(v)
    }
}

impl From<DictionaryValue> for PropertyValue {
    fn from(v: DictionaryValue) -> Self {
        PropertyValue::Dictionary(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Scalar(b.into())
    }
}

impl From<char> for PropertyValue {
    fn from(c: char) -> Self {
        PropertyValue::Scalar(c.into())
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Scalar(s.into())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Scalar(s.into())
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(dt: DateTime<Utc>) -> Self {
        PropertyValue::Scalar(dt.into())
    }
}
