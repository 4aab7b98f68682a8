//! Message templates
//!
//! A message template is text with named holes, e.g.
//! `"User {UserId} logged in from {@Client}"`. Holes capture the values
//! passed with a log call as event properties; the rendered message
//! substitutes the captured values back into the text.
//!
//! Supported hole syntax: `{Name}`, `{@Name}` (destructure), `{$Name}`
//! (stringify), `{Name,10}` / `{Name,-10}` (alignment) and `{Name:F2}`
//! (format hint). `{{` and `}}` are literal braces. Anything that does not
//! parse as a hole is kept as text.

use super::property_value::PropertyValue;
use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// Event properties keyed by name, iterated in a stable order
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// How a captured argument is converted into a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destructuring {
    /// Scalars stay scalars, collections become sequences, objects are opaque
    #[default]
    Default,
    /// `@`: objects are captured as structures
    Destructure,
    /// `$`: the value is captured as its string representation
    Stringify,
}

/// A hole in a message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyToken {
    name: String,
    destructuring: Destructuring,
    alignment: Option<i32>,
    format: Option<String>,
    raw: String,
}

impl PropertyToken {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn destructuring(&self) -> Destructuring {
        self.destructuring
    }

    pub fn alignment(&self) -> Option<i32> {
        self.alignment
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// The hole as written in the template, braces included
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Index of a positional hole such as `{0}`
    pub fn position(&self) -> Option<usize> {
        if self.name.chars().all(|c| c.is_ascii_digit()) {
            self.name.parse().ok()
        } else {
            None
        }
    }

    fn render(&self, properties: &PropertyMap, out: &mut dyn Write) -> fmt::Result {
        let Some(value) = properties.get(&self.name) else {
            return out.write_str(&self.raw);
        };

        let Some(width) = self.alignment else {
            return value.render(out, self.format(), None);
        };

        let mut text = String::new();
        value.render(&mut text, self.format(), None)?;
        let left = width < 0;
        let width = width.unsigned_abs() as usize;
        if left {
            write!(out, "{:<width$}", text, width = width)
        } else {
            write!(out, "{:>width$}", text, width = width)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTemplateToken {
    Text(String),
    Property(PropertyToken),
}

/// A parsed message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    text: String,
    tokens: Vec<MessageTemplateToken>,
}

impl MessageTemplate {
    /// Build a template from tokens produced elsewhere
    pub fn from_tokens(text: impl Into<String>, tokens: Vec<MessageTemplateToken>) -> Self {
        Self {
            text: text.into(),
            tokens,
        }
    }

    /// Parse template text; never fails
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = parse_tokens(&text);
        Self { text, tokens }
    }

    /// A template with no holes
    pub fn empty() -> Self {
        Self::from_tokens(String::new(), Vec::new())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[MessageTemplateToken] {
        &self.tokens
    }

    pub fn property_tokens(&self) -> impl Iterator<Item = &PropertyToken> {
        self.tokens.iter().filter_map(|token| match token {
            MessageTemplateToken::Property(p) => Some(p),
            MessageTemplateToken::Text(_) => None,
        })
    }

    /// True when the template has holes and all of them are positional
    pub fn is_positional(&self) -> bool {
        let mut tokens = self.property_tokens().peekable();
        tokens.peek().is_some() && tokens.all(|t| t.position().is_some())
    }

    /// Substitute property values into the template
    ///
    /// Holes without a matching property are written as they appear in the
    /// template.
    pub fn render(&self, properties: &PropertyMap, out: &mut dyn Write) -> fmt::Result {
        for token in &self.tokens {
            match token {
                MessageTemplateToken::Text(text) => out.write_str(text)?,
                MessageTemplateToken::Property(p) => p.render(properties, out)?,
            }
        }
        Ok(())
    }

    pub fn render_to_string(&self, properties: &PropertyMap) -> String {
        let mut text = String::new();
        let _ = self.render(properties, &mut text);
        text
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn parse_tokens(template: &str) -> Vec<MessageTemplateToken> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        match c {
            '{' if rest.starts_with("{{") => {
                text.push('{');
                rest = &rest[2..];
            }
            '{' => {
                // A hole ends at the first '}' unless another '{' opens first.
                let body_end = rest[1..].find(['{', '}']).map(|i| i + 1);
                match body_end {
                    Some(end) if rest.as_bytes()[end] == b'}' => {
                        let raw = &rest[..=end];
                        match parse_property(raw) {
                            Some(token) => {
                                if !text.is_empty() {
                                    tokens.push(MessageTemplateToken::Text(std::mem::take(&mut text)));
                                }
                                tokens.push(MessageTemplateToken::Property(token));
                            }
                            None => text.push_str(raw),
                        }
                        rest = &rest[end + 1..];
                    }
                    Some(end) => {
                        text.push_str(&rest[..end]);
                        rest = &rest[end..];
                    }
                    None => {
                        text.push_str(rest);
                        rest = "";
                    }
                }
            }
            '}' if rest.starts_with("}}") => {
                text.push('}');
                rest = &rest[2..];
            }
            _ => {
                text.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    if !text.is_empty() {
        tokens.push(MessageTemplateToken::Text(text));
    }
    tokens
}

/// Parse `{...}` into a property token; `None` if it is not a valid hole
fn parse_property(raw: &str) -> Option<PropertyToken> {
    let body = &raw[1..raw.len() - 1];

    let (destructuring, body) = match body.chars().next()? {
        '@' => (Destructuring::Destructure, &body[1..]),
        '$' => (Destructuring::Stringify, &body[1..]),
        _ => (Destructuring::Default, body),
    };

    let (head, format) = match body.split_once(':') {
        Some((head, format)) if !format.is_empty() => (head, Some(format.to_string())),
        Some(_) => return None,
        None => (body, None),
    };

    let (name, alignment) = match head.split_once(',') {
        Some((name, alignment)) => (name, Some(parse_alignment(alignment)?)),
        None => (head, None),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    Some(PropertyToken {
        name: name.to_string(),
        destructuring,
        alignment,
        format,
        raw: raw.to_string(),
    })
}

/// Widest alignment a hole may request
const MAX_ALIGNMENT: i32 = 4096;

fn parse_alignment(text: &str) -> Option<i32> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse()
        .ok()
        .filter(|width: &i32| width.unsigned_abs() <= MAX_ALIGNMENT.unsigned_abs())
}
