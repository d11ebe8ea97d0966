//! Dynamic value representation for parse results.
//!
//! Grammar nodes produce raw matched text; reshape functions and capture keys
//! turn that text into structured values. `Value` is the common currency for
//! both, and serializes as plain JSON so it can travel across worker channels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A domain value produced by a successful match.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let text = Value::from("let");
/// assert_eq!(text.as_text(), Some("let"));
/// assert_eq!(text.type_name(), "text");
/// assert!(Value::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Result of a nullable node that did not match
    #[default]
    Null,
    /// Boolean produced by a reshape
    Bool(bool),
    /// Number produced by a reshape
    Number(f64),
    /// Matched substring, or text produced by a reshape
    Text(String),
    /// Values collected by a repetition
    List(Vec<Value>),
    /// Captured values of an object-producing sequence, keyed by capture name
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the text content if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list items if this is a `List` value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a captured field of an `Object` value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    /// Concatenates every text fragment reachable from this value, depth first.
    ///
    /// Objects contribute their fields in key order. Numbers and booleans are
    /// rendered with their `Display` form; `Null` contributes nothing.
    pub fn flatten_text(&self) -> String {
        let mut out = String::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut String) {
        match self {
            Value::Null => {}
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(&n.to_string()),
            Value::Text(s) => out.push_str(s),
            Value::List(items) => items.iter().for_each(|item| item.flatten_into(out)),
            Value::Object(fields) => fields.values().for_each(|v| v.flatten_into(out)),
        }
    }

    /// Converts into a JSON value for transport.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
