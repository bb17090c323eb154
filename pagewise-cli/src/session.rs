//! Wizard Session
//!
//! Ties a wizard definition to its saved answers: loads wizard.toml, builds
//! the model, restores the state file and writes it back after changes.

use anyhow::{Context, Result};
use pagewise_core::config::WizardConfig;
use pagewise_core::{Page, PageKind, SavedState, Value, WizardModel};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Session {
    pub config: WizardConfig,
    pub model: WizardModel,
    pub state_path: PathBuf,
}

impl Session {
    /// Open the wizard at `config_path` (default: ./wizard.toml) with its saved answers
    pub fn open(config_path: Option<&Path>, state_path: Option<PathBuf>) -> Result<Self> {
        let mut session = Self::open_definition(config_path, state_path)?;
        session.restore()?;
        Ok(session)
    }

    /// Open the wizard without reading its state file
    ///
    /// Used by `reset`, which must work even when the state file is unreadable.
    pub fn open_definition(config_path: Option<&Path>, state_path: Option<PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(path) => WizardConfig::from_file(path)?,
            None => WizardConfig::from_current_dir()?,
        };
        config.validate()?;

        let mut model = WizardModel::new(&config, config.string_table())
            .context("Invalid wizard definition")?;
        if config.wizard.reverse {
            model.reverse_pages();
        }

        let state_path = state_path.unwrap_or_else(|| default_state_path(&config.wizard.name));

        Ok(Self {
            config,
            model,
            state_path,
        })
    }

    /// Load the saved answers, if any, into the model
    pub fn restore(&mut self) -> Result<()> {
        let saved = SavedState::load_from_file(&self.state_path).with_context(|| {
            format!(
                "Saved answers are unreadable; run 'pagewise reset' to discard {}",
                self.state_path.display()
            )
        })?;

        if let Some(saved) = saved {
            tracing::info!("Restored {} saved pages from {:?}", saved.len(), self.state_path);
            self.model.load(&saved);
        }
        Ok(())
    }

    /// Answer page `key` from command-line words
    ///
    /// Only pages of the current sequence are saved, so answering a page of
    /// an inactive branch is refused instead of being dropped on save.
    pub fn answer(&mut self, key: &str, words: &[String]) -> Result<()> {
        let page = self
            .model
            .find_by_key(key)
            .with_context(|| format!("No page with key '{}'", key))?;

        let is_active = self
            .model
            .current_page_sequence()
            .iter()
            .any(|p| p.key() == key);
        if !is_active {
            match page.parent_key() {
                Some(choice) => anyhow::bail!(
                    "Page '{}' is not part of the current steps; it follows the choice '{}'",
                    key,
                    choice
                ),
                None => anyhow::bail!("Page '{}' is not part of the current steps", key),
            }
        }

        let answer = parse_answer(page, words);
        self.model.set_value(key, answer)?;
        Ok(())
    }

    /// Persist the answers of the current sequence
    pub fn save(&self) -> Result<()> {
        self.model.save().save_to_file(&self.state_path)
    }

    /// Forget all saved answers; returns whether a state file existed
    pub fn reset(&self) -> Result<bool> {
        if !self.state_path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&self.state_path)
            .with_context(|| format!("Failed to delete {}", self.state_path.display()))?;
        tracing::info!("Deleted saved state: {:?}", self.state_path);
        Ok(true)
    }
}

/// Directory holding saved answers (~/.local/share/pagewise/state)
pub fn state_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("pagewise")
        .join("state")
}

/// Saved-state file for the wizard called `name`
pub fn default_state_path(name: &str) -> PathBuf {
    state_dir().join(format!("{}.json", to_kebab_case(name)))
}

/// Convert command-line words into a value fitting `page`
///
/// Multiple-choice pages take one word per choice; everything else joins
/// the words with spaces.
pub fn parse_answer(page: &Page, words: &[String]) -> Value {
    match page.kind() {
        PageKind::MultipleChoice { .. } => Value::List(words.to_vec()),
        _ => Value::Text(words.join(" ")),
    }
}

fn to_kebab_case(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewise_core::config::generate_template;

    fn write_wizard(dir: &Path) -> PathBuf {
        let path = dir.join("wizard.toml");
        std::fs::write(&path, generate_template("Lunch")).unwrap();
        path
    }

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("Lunch Order"), "lunch-order");
        assert_eq!(to_kebab_case(" My_Wizard "), "my-wizard");
    }

    #[test]
    fn test_default_state_path() {
        let path = default_state_path("Lunch Order");
        assert!(path.ends_with("pagewise/state/lunch-order.json"));
    }

    #[test]
    fn test_parse_answer() {
        let words = vec!["Ham".to_string(), "Cheese".to_string()];

        let multi = Page::multiple_choice("f", "F", ["Ham", "Cheese"]);
        assert_eq!(parse_answer(&multi, &words), Value::from(vec!["Ham", "Cheese"]));

        let text = Page::text("n", "N");
        assert_eq!(parse_answer(&text, &words), Value::from("Ham Cheese"));
    }

    #[test]
    fn test_answer_refuses_inactive_pages() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_wizard(dir.path());
        let state = dir.path().join("lunch.json");

        let mut session = Session::open(Some(&config), Some(state.clone())).unwrap();
        session.answer("order_type", &["Salad".to_string()]).unwrap();

        let err = session.answer("bread", &["Rye".to_string()]).unwrap_err();
        assert!(err.to_string().contains("not part of the current steps"));
        assert!(err.to_string().contains("Sandwich"));
        assert_eq!(session.model.find_by_key("bread").unwrap().value(), None);

        session.answer("dressing", &["Ranch".to_string()]).unwrap();
        session.save().unwrap();

        let reopened = Session::open(Some(&config), Some(state)).unwrap();
        let dressing = reopened.model.find_by_key("dressing").unwrap();
        assert_eq!(dressing.value(), Some(&Value::from("Ranch")));

        let missing = session.answer("nope", &["x".to_string()]).unwrap_err();
        assert!(missing.to_string().contains("No page with key 'nope'"));
    }

    #[test]
    fn test_reset_discards_unreadable_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_wizard(dir.path());
        let state = dir.path().join("lunch.json");
        std::fs::write(&state, r#"{"quantity":{"_":3}}"#).unwrap();

        let err = Session::open(Some(&config), Some(state.clone())).unwrap_err();
        assert!(format!("{:#}", err).contains("pagewise reset"));

        let session = Session::open_definition(Some(&config), Some(state.clone())).unwrap();
        assert!(session.reset().unwrap());
        assert!(!state.exists());

        assert!(Session::open(Some(&config), Some(state)).is_ok());
    }

    #[test]
    fn test_session_persists_answers() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_wizard(dir.path());
        let state = dir.path().join("state").join("lunch.json");

        let mut session = Session::open(Some(&config), Some(state.clone())).unwrap();
        session.model.set_value("order_type", "Salad").unwrap();
        session.model.set_value("dressing", "Ranch").unwrap();
        session.save().unwrap();

        let reopened = Session::open(Some(&config), Some(state.clone())).unwrap();
        let dressing = reopened.model.find_by_key("dressing").unwrap();
        assert_eq!(dressing.value(), Some(&Value::from("Ranch")));
        assert!(reopened
            .model
            .current_page_sequence()
            .iter()
            .any(|p| p.key() == "dressing"));

        assert!(reopened.reset().unwrap());
        assert!(!reopened.reset().unwrap());
        assert!(!state.exists());
    }
}
