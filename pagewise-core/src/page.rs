//! Wizard Pages
//!
//! A page is one step of the wizard. The set of page kinds is closed: each
//! [`PageKind`] decides how the page completes, which screen renders it and
//! what it contributes to the review summary.

use crate::branch::{self, Branch};
use crate::data::{PageData, Value, VALUE_KEY};
use crate::error::{Result, WizardError};
use crate::review::ReviewItem;
use serde::Serialize;

/// Screen the UI layer should use to render a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    TextInput,
    NumberInput,
    ImagePicker,
    SingleChoice,
    MultipleChoice,
}

/// The kind of a page, along with the data only that kind carries
#[derive(Debug, Clone)]
pub enum PageKind {
    /// Free text entry
    Text,

    /// Numeric entry, stored as text
    Number,

    /// A reference to an image (path or URI), stored as text
    Image,

    /// Exactly one of a fixed set of choices
    SingleChoice { choices: Vec<String> },

    /// Any subset of a fixed set of choices, stored as a list
    MultipleChoice { choices: Vec<String> },

    /// A branching point; the chosen label decides which child pages follow
    Branch { branches: Vec<Branch> },
}

impl PageKind {
    /// Short name used in logs and the CLI tree listing
    pub fn name(&self) -> &'static str {
        match self {
            PageKind::Text => "text",
            PageKind::Number => "number",
            PageKind::Image => "image",
            PageKind::SingleChoice { .. } => "single-choice",
            PageKind::MultipleChoice { .. } => "multiple-choice",
            PageKind::Branch { .. } => "branch",
        }
    }

    pub fn screen(&self) -> Screen {
        match self {
            PageKind::Text => Screen::TextInput,
            PageKind::Number => Screen::NumberInput,
            PageKind::Image => Screen::ImagePicker,
            // A branch is answered like any other single choice
            PageKind::SingleChoice { .. } | PageKind::Branch { .. } => Screen::SingleChoice,
            PageKind::MultipleChoice { .. } => Screen::MultipleChoice,
        }
    }
}

/// A single wizard step
#[derive(Debug, Clone)]
pub struct Page {
    key: String,
    title: String,
    parent_key: Option<String>,
    required: bool,
    review_weight: i32,
    data: PageData,
    pub(crate) kind: PageKind,
}

impl Page {
    pub fn new(key: impl Into<String>, title: impl Into<String>, kind: PageKind) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            parent_key: None,
            required: true,
            review_weight: 0,
            data: PageData::new(),
            kind,
        }
    }

    pub fn text(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(key, title, PageKind::Text)
    }

    pub fn number(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(key, title, PageKind::Number)
    }

    pub fn image(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(key, title, PageKind::Image)
    }

    pub fn single_choice<I, S>(key: impl Into<String>, title: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices = choices.into_iter().map(Into::into).collect();
        Self::new(key, title, PageKind::SingleChoice { choices })
    }

    pub fn multiple_choice<I, S>(key: impl Into<String>, title: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices = choices.into_iter().map(Into::into).collect();
        Self::new(key, title, PageKind::MultipleChoice { choices })
    }

    /// Mark the page as optional or required (pages are required by default)
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sort weight of this page's review items (lower sorts first)
    pub fn with_review_weight(mut self, weight: i32) -> Self {
        self.review_weight = weight;
        self
    }

    /// Preset the primary value
    ///
    /// The value is checked against the page kind when the tree is
    /// validated, which `WizardModel::from_page_list` always does.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.data.insert(VALUE_KEY, value);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Choice label of the branch this page belongs to, `None` at the root
    pub fn parent_key(&self) -> Option<&str> {
        self.parent_key.as_deref()
    }

    pub(crate) fn set_parent_key(&mut self, parent_key: Option<String>) {
        self.parent_key = parent_key;
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> &PageKind {
        &self.kind
    }

    pub fn screen(&self) -> Screen {
        self.kind.screen()
    }

    pub fn data(&self) -> &PageData {
        &self.data
    }

    /// The primary value of the page, if any
    pub fn value(&self) -> Option<&Value> {
        self.data.value()
    }

    /// Replace the whole data bag (used when restoring saved state)
    pub fn reset_data(&mut self, data: PageData) {
        self.data = data;
    }

    /// Options offered by choice pages; branch labels for branch pages
    pub fn options(&self) -> Vec<&str> {
        match &self.kind {
            PageKind::SingleChoice { choices } | PageKind::MultipleChoice { choices } => {
                choices.iter().map(String::as_str).collect()
            }
            PageKind::Branch { branches } => branches.iter().map(Branch::choice).collect(),
            _ => Vec::new(),
        }
    }

    /// Registered branches, `None` unless this is a branch page
    pub fn branches(&self) -> Option<&[Branch]> {
        match &self.kind {
            PageKind::Branch { branches } => Some(branches),
            _ => None,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, PageKind::Branch { .. })
    }

    /// The branch selected by the current value, if it names one
    pub fn selected_branch(&self) -> Option<&Branch> {
        match &self.kind {
            PageKind::Branch { branches } => {
                branch::select(branches, self.data.get_text(VALUE_KEY))
            }
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        match &self.kind {
            PageKind::Text | PageKind::Image | PageKind::SingleChoice { .. } => self
                .data
                .get_text(VALUE_KEY)
                .is_some_and(|s| !s.is_empty()),
            PageKind::Number => self
                .data
                .get_text(VALUE_KEY)
                .is_some_and(|s| s.trim().parse::<f64>().is_ok()),
            PageKind::MultipleChoice { .. } => self
                .data
                .get_list(VALUE_KEY)
                .is_some_and(|items| !items.is_empty()),
            PageKind::Branch { .. } => self.selected_branch().is_some(),
        }
    }

    /// Check that `value` may be stored as this page's primary value
    pub fn validate_value(&self, value: &Value) -> Result<()> {
        let unsupported = || WizardError::UnsupportedValue {
            page: self.key.clone(),
            kind: value.kind_name(),
        };
        let invalid = |v: &str| WizardError::InvalidChoice {
            page: self.key.clone(),
            value: v.to_string(),
        };

        match (&self.kind, value) {
            (PageKind::Text | PageKind::Number | PageKind::Image, Value::Text(_)) => Ok(()),
            (PageKind::SingleChoice { choices }, Value::Text(v)) => {
                if v.is_empty() || choices.iter().any(|c| c == v) {
                    Ok(())
                } else {
                    Err(invalid(v))
                }
            }
            (PageKind::MultipleChoice { choices }, Value::List(items)) => {
                match items.iter().find(|item| !choices.contains(item)) {
                    Some(bad) => Err(invalid(bad)),
                    None => Ok(()),
                }
            }
            (PageKind::Branch { branches }, Value::Text(v)) => {
                if v.is_empty() || branch::select(branches, Some(v)).is_some() {
                    Ok(())
                } else {
                    Err(invalid(v))
                }
            }
            _ => Err(unsupported()),
        }
    }

    /// Validate and store the primary value
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.validate_value(&value)?;
        self.data.insert(VALUE_KEY, value);
        Ok(())
    }

    pub fn clear_value(&mut self) {
        self.data.remove(VALUE_KEY);
    }

    /// Append the review summary entries of this page
    pub fn review_items(&self, dest: &mut Vec<ReviewItem>) {
        let display = self.value().map(Value::to_string).unwrap_or_default();
        dest.push(ReviewItem::new(&self.title, display, &self.key).with_weight(self.review_weight));
    }

    /// Depth-first search through this page and every one of its branches
    pub fn find_by_key(&self, key: &str) -> Option<&Page> {
        if self.key == key {
            return Some(self);
        }

        match &self.kind {
            PageKind::Branch { branches } => branches
                .iter()
                .find_map(|branch| branch.pages().find_by_key(key)),
            _ => None,
        }
    }

    pub fn find_by_key_mut(&mut self, key: &str) -> Option<&mut Page> {
        if self.key == key {
            return Some(self);
        }

        match &mut self.kind {
            PageKind::Branch { branches } => branches
                .iter_mut()
                .find_map(|branch| branch.pages_mut().find_by_key_mut(key)),
            _ => None,
        }
    }

    /// Append this page, then the pages of its selected branch
    pub fn flatten_current_page_sequence<'a>(&'a self, destination: &mut Vec<&'a Page>) {
        destination.push(self);

        if let Some(branch) = self.selected_branch() {
            branch.pages().flatten_current_page_sequence(destination);
        }
    }

    /// Visit this page and every descendant, active or not, in declaration order
    pub(crate) fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a Page)) {
        visitor(self);
        if let PageKind::Branch { branches } = &self.kind {
            for branch in branches {
                branch.pages().visit(visitor);
            }
        }
    }
}
