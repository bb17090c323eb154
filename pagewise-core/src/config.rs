//! Wizard Definition Files
//!
//! Parses wizard.toml files describing a page tree declaratively.

use crate::branch::BranchPage;
use crate::data::Value;
use crate::error::Result as WizardResult;
use crate::model::WizardDefinition;
use crate::page::Page;
use crate::page_list::PageList;
use crate::strings::{self, StringTable, Strings};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Default file name looked up in the current directory
pub const DEFAULT_FILE_NAME: &str = "wizard.toml";

/// The main configuration structure matching wizard.toml
#[derive(Debug, Deserialize)]
pub struct WizardConfig {
    pub wizard: WizardSection,

    /// Display strings referenced from titles as `@id`
    #[serde(default)]
    pub strings: StringTable,

    /// Top-level pages, in presentation order
    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

/// Wizard-wide settings
#[derive(Debug, Deserialize)]
pub struct WizardSection {
    /// Name of the wizard, also used to name its saved state
    pub name: String,

    /// Short description shown before the first page (optional)
    #[serde(default)]
    pub description: Option<String>,

    /// Present the top-level pages in reverse order (default: false)
    #[serde(default)]
    pub reverse: bool,
}

/// Page kinds as spelled in wizard.toml
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKindConfig {
    Text,
    Number,
    Image,
    SingleChoice,
    MultipleChoice,
    Branch,
}

/// A single page declaration
#[derive(Debug, Deserialize)]
pub struct PageConfig {
    pub kind: PageKindConfig,

    /// Unique page key
    pub key: String,

    /// Title, or `@id` to look it up in [strings]
    pub title: String,

    /// Whether the page must be completed (default: true)
    #[serde(default = "default_required")]
    pub required: bool,

    /// Sort weight of the page in the review summary (default: 0)
    #[serde(default)]
    pub review_weight: i32,

    /// Fixed choices for single-choice and multiple-choice pages
    #[serde(default)]
    pub choices: Vec<String>,

    /// Branches of a branch page
    #[serde(default)]
    pub branches: Vec<BranchConfig>,

    /// Preselected value (optional)
    #[serde(default)]
    pub default: Option<Value>,
}

/// One branch of a branch page
#[derive(Debug, Deserialize)]
pub struct BranchConfig {
    /// Choice label selecting this branch
    pub choice: String,

    /// Pages following the branch page when this choice is selected
    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

fn default_required() -> bool {
    true
}

impl WizardConfig {
    /// Load configuration from a file path
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read wizard file: {}", path.display()))?;

        Self::from_str(&contents)
    }

    /// Load configuration from the current directory
    pub fn from_current_dir() -> Result<Self> {
        let config_path = std::env::current_dir()?.join(DEFAULT_FILE_NAME);

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in current directory.\n\
                 Run 'pagewise init' to create one, or specify a path with --config",
                DEFAULT_FILE_NAME
            );
        }

        Self::from_file(&config_path)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("Failed to parse wizard definition")
    }

    /// The `[strings]` table of this file
    pub fn string_table(&self) -> &StringTable {
        &self.strings
    }

    /// Validate the declarations that the page tree itself cannot express
    pub fn validate(&self) -> Result<()> {
        if self.wizard.name.trim().is_empty() {
            anyhow::bail!("[wizard] name must not be empty");
        }

        if self.pages.is_empty() {
            anyhow::bail!("Wizard '{}' declares no pages", self.wizard.name);
        }

        for page in &self.pages {
            page.validate()?;
        }

        Ok(())
    }
}

impl PageConfig {
    fn validate(&self) -> Result<()> {
        let is_choice = matches!(
            self.kind,
            PageKindConfig::SingleChoice | PageKindConfig::MultipleChoice
        );

        if is_choice && self.choices.is_empty() {
            anyhow::bail!("Page '{}' needs at least one entry in 'choices'", self.key);
        }

        if !is_choice && !self.choices.is_empty() {
            anyhow::bail!(
                "Page '{}' lists 'choices' but is not a choice page; use kind = \"single-choice\"",
                self.key
            );
        }

        match self.kind {
            PageKindConfig::Branch if self.branches.is_empty() => {
                anyhow::bail!("Branch page '{}' declares no branches", self.key);
            }
            PageKindConfig::Branch => {}
            _ if !self.branches.is_empty() => {
                anyhow::bail!(
                    "Page '{}' declares branches but is not a branch page; use kind = \"branch\"",
                    self.key
                );
            }
            _ => {}
        }

        for branch in &self.branches {
            for page in &branch.pages {
                page.validate()?;
            }
        }

        Ok(())
    }

    fn to_page(&self, strings: &dyn Strings) -> WizardResult<Page> {
        let title = strings::resolve(strings, &self.title)?;

        let page = match self.kind {
            PageKindConfig::Text => Page::text(&self.key, title),
            PageKindConfig::Number => Page::number(&self.key, title),
            PageKindConfig::Image => Page::image(&self.key, title),
            PageKindConfig::SingleChoice => Page::single_choice(&self.key, title, &self.choices),
            PageKindConfig::MultipleChoice => {
                Page::multiple_choice(&self.key, title, &self.choices)
            }
            PageKindConfig::Branch => {
                let mut builder = BranchPage::new(&self.key, title);
                for branch in &self.branches {
                    let pages = branch
                        .pages
                        .iter()
                        .map(|page| page.to_page(strings))
                        .collect::<WizardResult<Vec<_>>>()?;
                    builder = builder.add_branch(&branch.choice, pages);
                }
                builder.build()
            }
        };

        let mut page = page
            .required(self.required)
            .with_review_weight(self.review_weight);

        if let Some(ref default) = self.default {
            page.set_value(default.clone())?;
        }

        Ok(page)
    }
}

impl WizardDefinition for WizardConfig {
    fn root_page_list(&self, strings: &dyn Strings) -> WizardResult<PageList> {
        self.pages.iter().map(|page| page.to_page(strings)).collect()
    }
}

/// Generate a template wizard.toml file
pub fn generate_template(name: &str) -> String {
    format!(r#"# Pagewise Wizard Definition

[wizard]
name = "{name}"
description = "Order a lunch in a few steps"

# Present the top-level pages in reverse order
reverse = false

[strings]
bread_title = "Bread"

[[pages]]
kind = "branch"
key = "order_type"
title = "Order type"

  [[pages.branches]]
  choice = "Sandwich"

    [[pages.branches.pages]]
    kind = "single-choice"
    key = "bread"
    title = "@bread_title"
    choices = ["White", "Wheat", "Rye"]

    [[pages.branches.pages]]
    kind = "multiple-choice"
    key = "fillings"
    title = "Fillings"
    choices = ["Ham", "Cheese", "Tomato", "Lettuce"]

  [[pages.branches]]
  choice = "Salad"

    [[pages.branches.pages]]
    kind = "single-choice"
    key = "dressing"
    title = "Dressing"
    choices = ["Vinaigrette", "Ranch", "None"]

[[pages]]
kind = "number"
key = "quantity"
title = "How many?"
default = "1"

[[pages]]
kind = "text"
key = "name"
title = "Name for the order"
review_weight = -1

[[pages]]
kind = "text"
key = "notes"
title = "Anything else?"
required = false
"#,
        name = name,
    )
}
