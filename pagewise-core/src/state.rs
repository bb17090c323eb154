//! Saved Wizard State
//!
//! A generic container mapping page keys to page data bags. Produced by
//! `WizardModel::save` and consumed by `WizardModel::load`; the JSON helpers
//! let front ends persist it between sessions.

use crate::data::PageData;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedState {
    pages: BTreeMap<String, PageData>,
}

impl SavedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, data: PageData) {
        self.pages.insert(key.into(), data);
    }

    pub fn get(&self, key: &str) -> Option<&PageData> {
        self.pages.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pages.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PageData)> {
        self.pages.iter()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize wizard state")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse wizard state JSON")
    }

    /// Write the state to `path`, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        tracing::debug!("Saved wizard state to {:?}", path);
        Ok(())
    }

    /// Read the state at `path`; `None` when no state has been saved yet
    pub fn load_from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        Self::from_json(&json).map(Some)
    }
}

/// State holding a single page's data, handy for partial restores
impl From<(&str, PageData)> for SavedState {
    fn from((key, data): (&str, PageData)) -> Self {
        let mut saved = SavedState::new();
        saved.insert(key, data);
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::VALUE_KEY;

    fn sample() -> SavedState {
        let mut color = PageData::new();
        color.insert(VALUE_KEY, "Blue");
        let mut toppings = PageData::new();
        toppings.insert(VALUE_KEY, vec!["Ham"]);

        let mut state = SavedState::new();
        state.insert("color", color);
        state.insert("toppings", toppings);
        state
    }

    #[test]
    fn test_json_layout() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["color"]["_"], "Blue");
        assert_eq!(value["toppings"]["_"][0], "Ham");
    }

    #[test]
    fn test_file_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        assert_eq!(SavedState::load_from_file(&path).unwrap(), None);

        sample().save_to_file(&path).unwrap();
        let loaded = SavedState::load_from_file(&path).unwrap().unwrap();
        assert_eq!(loaded, sample());
        assert!(loaded.contains_key("color"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(SavedState::from_json("[1, 2").is_err());
    }
}
