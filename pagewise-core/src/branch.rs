//! Branch Pages
//!
//! A branch page is a branching point in the wizard. Depending on which
//! choice is selected, the next set of steps may change. Only the branch
//! whose label equals the page's current value contributes pages to the
//! flattened sequence.

use crate::data::Value;
use crate::page::{Page, PageKind};
use crate::page_list::PageList;

/// A named alternative sub-sequence of pages
#[derive(Debug, Clone)]
pub struct Branch {
    choice: String,
    pages: PageList,
}

impl Branch {
    /// The choice label selecting this branch
    pub fn choice(&self) -> &str {
        &self.choice
    }

    pub fn pages(&self) -> &PageList {
        &self.pages
    }

    pub(crate) fn pages_mut(&mut self) -> &mut PageList {
        &mut self.pages
    }
}

/// Builder for a page of kind [`PageKind::Branch`]
///
/// ```
/// use pagewise_core::{BranchPage, Page};
///
/// let color: Page = BranchPage::new("color", "Favorite color")
///     .add_branch("Red", [Page::text("why_red", "Why red?")])
///     .add_branch("Blue", [Page::text("shade", "Which shade?")])
///     .into();
/// assert_eq!(color.options(), vec!["Red", "Blue"]);
/// ```
#[derive(Debug, Clone)]
pub struct BranchPage {
    page: Page,
}

impl BranchPage {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            page: Page::new(key, title, PageKind::Branch { branches: Vec::new() }),
        }
    }

    /// Register `choice` as a label leading to `pages`
    ///
    /// Every child page gets `choice` as its parent key. Registering the same
    /// label twice is reported by `WizardModel::new`.
    pub fn add_branch(
        mut self,
        choice: impl Into<String>,
        pages: impl IntoIterator<Item = Page>,
    ) -> Self {
        let choice = choice.into();
        let mut pages = PageList::new(pages);
        for page in pages.iter_mut() {
            page.set_parent_key(Some(choice.clone()));
        }

        if let PageKind::Branch { branches } = &mut self.page.kind {
            branches.push(Branch { choice, pages });
        }
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.page = self.page.required(required);
        self
    }

    pub fn with_review_weight(mut self, weight: i32) -> Self {
        self.page = self.page.with_review_weight(weight);
        self
    }

    /// Preselect a branch; an unknown label is rejected when the model is built
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.page = self.page.with_value(Value::Text(value.into()));
        self
    }

    pub fn option_count(&self) -> usize {
        self.page.branches().map_or(0, <[Branch]>::len)
    }

    pub fn option_at(&self, position: usize) -> Option<&str> {
        self.page
            .branches()
            .and_then(|branches| branches.get(position))
            .map(Branch::choice)
    }

    pub fn build(self) -> Page {
        self.page
    }
}

impl From<BranchPage> for Page {
    fn from(branch: BranchPage) -> Self {
        branch.build()
    }
}

/// First branch whose label equals `value`
pub(crate) fn select<'a>(branches: &'a [Branch], value: Option<&str>) -> Option<&'a Branch> {
    let value = value.filter(|v| !v.is_empty())?;
    branches.iter().find(|branch| branch.choice == value)
}

/// First label registered more than once, in registration order
pub(crate) fn duplicate_choice(branches: &[Branch]) -> Option<&str> {
    branches
        .iter()
        .enumerate()
        .find(|(i, branch)| branches[..*i].iter().any(|b| b.choice == branch.choice))
        .map(|(_, branch)| branch.choice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PageData, VALUE_KEY};

    fn color_page() -> BranchPage {
        BranchPage::new("color", "Color")
            .add_branch("Red", [Page::text("x", "X")])
            .add_branch("Blue", [Page::text("y", "Y"), Page::text("z", "Z")])
    }

    #[test]
    fn test_children_get_parent_key() {
        let page = color_page().build();
        let branches = page.branches().unwrap();

        assert_eq!(branches[0].pages().find_by_key("x").unwrap().parent_key(), Some("Red"));
        assert_eq!(branches[1].pages().find_by_key("z").unwrap().parent_key(), Some("Blue"));
        assert_eq!(page.parent_key(), None);
    }

    #[test]
    fn test_options_in_registration_order() {
        let builder = color_page();
        assert_eq!(builder.option_count(), 2);
        assert_eq!(builder.option_at(0), Some("Red"));
        assert_eq!(builder.option_at(1), Some("Blue"));
        assert_eq!(builder.option_at(2), None);
    }

    #[test]
    fn test_completion_tracks_selection() {
        let mut page = color_page().build();
        assert!(!page.is_completed());

        page.set_value("Blue").unwrap();
        assert!(page.is_completed());
        assert_eq!(page.selected_branch().map(Branch::choice), Some("Blue"));

        // Values restored from elsewhere may name no branch at all
        let mut data = PageData::new();
        data.insert(VALUE_KEY, "Green");
        page.reset_data(data);
        assert!(page.selected_branch().is_none());
        assert!(!page.is_completed());
    }

    #[test]
    fn test_rejects_unknown_label() {
        let mut page = color_page().build();
        assert!(page.set_value("Green").is_err());
        assert!(page.set_value("").is_ok());
    }

    #[test]
    fn test_duplicate_choice_detection() {
        let page = BranchPage::new("b", "B")
            .add_branch("One", Vec::<Page>::new())
            .add_branch("Two", Vec::<Page>::new())
            .add_branch("One", Vec::<Page>::new())
            .build();
        assert_eq!(duplicate_choice(page.branches().unwrap()), Some("One"));
        assert_eq!(duplicate_choice(color_page().build().branches().unwrap()), None);
    }
}
