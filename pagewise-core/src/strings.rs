//! String Lookup
//!
//! Wizard definitions can refer to display strings by id (`@id`) instead of
//! spelling them out. The lookup is injected when a model is built, so the
//! core never reaches for a global resource table.

use crate::error::{Result, WizardError};
use serde::Deserialize;
use std::collections::HashMap;

/// Prefix marking a title as a string id
pub const STRING_REF_PREFIX: char = '@';

/// Source of localized display strings
pub trait Strings {
    fn get(&self, id: &str) -> Option<&str>;
}

/// Lookup that knows no strings; plain titles still resolve to themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStrings;

impl Strings for NoStrings {
    fn get(&self, _id: &str) -> Option<&str> {
        None
    }
}

/// In-memory string table, e.g. the `[strings]` section of a wizard file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StringTable {
    entries: HashMap<String, String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(id.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Strings for StringTable {
    fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for StringTable {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut table = Self::new();
        for (id, text) in pairs {
            table.insert(id, text);
        }
        table
    }
}

/// Resolve `@id` references through `strings`; any other text is returned as is
pub fn resolve(strings: &dyn Strings, text: &str) -> Result<String> {
    match text.strip_prefix(STRING_REF_PREFIX) {
        Some(id) => strings
            .get(id)
            .map(str::to_string)
            .ok_or_else(|| WizardError::MissingString(id.to_string())),
        None => Ok(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_reference() {
        let table = StringTable::from([("bread", "Bread type")]);
        assert_eq!(resolve(&table, "@bread").unwrap(), "Bread type");
        assert_eq!(resolve(&table, "Plain title").unwrap(), "Plain title");
    }

    #[test]
    fn test_missing_reference() {
        assert_eq!(
            resolve(&NoStrings, "@nope"),
            Err(WizardError::MissingString("nope".into()))
        );
    }
}
