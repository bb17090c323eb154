//! Page Data
//!
//! The per-page data bag: a string-keyed map over a small closed set of
//! value kinds. Every page kind keeps its primary value under [`VALUE_KEY`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Data key holding the primary value of a page
pub const VALUE_KEY: &str = "_";

/// A single stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

impl Value {
    /// Short name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Flag(_) => "flag",
            Value::List(_) => "list",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the value carries anything a user would call an answer
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::Flag(_) => false,
            Value::List(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Flag(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            Value::List(items) => f.write_str(&items.join(", ")),
        }
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
        Value::Flag(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(String::from).collect())
    }
}

/// The data bag attached to each page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageData {
    entries: BTreeMap<String, Value>,
}

impl PageData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Typed getter for text entries
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(Value::as_list)
    }

    pub fn get_flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_flag)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// The primary value stored under [`VALUE_KEY`]
    pub fn value(&self) -> Option<&Value> {
        self.get(VALUE_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let mut data = PageData::new();
        data.insert(VALUE_KEY, "Blue");
        data.insert("agreed", true);
        data.insert("toppings", vec!["Ham", "Cheese"]);

        assert_eq!(data.get_text(VALUE_KEY), Some("Blue"));
        assert_eq!(data.get_flag("agreed"), Some(true));
        assert_eq!(data.get_list("toppings").map(|l| l.len()), Some(2));
        assert_eq!(data.get_text("toppings"), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a, b");
        assert_eq!(Value::from(false).to_string(), "no");
    }

    #[test]
    fn test_untagged_json_shape() {
        let mut data = PageData::new();
        data.insert(VALUE_KEY, vec!["x"]);
        data.insert("note", "hi");

        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"_":["x"],"note":"hi"}"#);

        let parsed: PageData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, data);
    }
}
