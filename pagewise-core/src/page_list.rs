//! Page Lists
//!
//! An ordered group of sibling pages. Order is significant: it is the order
//! in which steps are presented.

use crate::branch;
use crate::error::{Result, WizardError};
use crate::page::{Page, PageKind};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct PageList {
    pages: Vec<Page>,
}

impl PageList {
    pub fn new(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
        }
    }

    pub fn push(&mut self, page: impl Into<Page>) {
        self.pages.push(page.into());
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Page> {
        self.pages.iter_mut()
    }

    /// Depth-first search over every page, including pages of inactive branches
    ///
    /// The first match in declaration order wins.
    pub fn find_by_key(&self, key: &str) -> Option<&Page> {
        self.pages.iter().find_map(|page| page.find_by_key(key))
    }

    pub fn find_by_key_mut(&mut self, key: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find_map(|page| page.find_by_key_mut(key))
    }

    /// Append the currently active pages to `destination`
    ///
    /// Branch pages contribute themselves followed by their selected branch.
    /// Nothing is cached: choices may have changed since the last call.
    pub fn flatten_current_page_sequence<'a>(&'a self, destination: &mut Vec<&'a Page>) {
        for page in &self.pages {
            page.flatten_current_page_sequence(destination);
        }
    }

    /// Reverse the member order in place; nested branch children keep theirs
    pub fn reverse(&mut self) {
        self.pages.reverse();
    }

    /// Every page of the tree in declaration order, active or not
    pub fn all_pages(&self) -> Vec<&Page> {
        let mut pages = Vec::new();
        self.visit(&mut |page| pages.push(page));
        pages
    }

    pub(crate) fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a Page)) {
        for page in &self.pages {
            page.visit(visitor);
        }
    }

    /// Check the tree for empty keys, duplicate keys, duplicate branch labels
    /// and preset values the page would not accept
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut problem = None;

        self.visit(&mut |page| {
            if problem.is_some() {
                return;
            }

            if page.key().is_empty() {
                problem = Some(WizardError::EmptyKey {
                    title: page.title().to_string(),
                });
                return;
            }

            if !seen.insert(page.key()) {
                problem = Some(WizardError::DuplicateKey(page.key().to_string()));
                return;
            }

            if let PageKind::Branch { branches } = page.kind() {
                if let Some(choice) = branch::duplicate_choice(branches) {
                    problem = Some(WizardError::DuplicateBranch {
                        page: page.key().to_string(),
                        choice: choice.to_string(),
                    });
                    return;
                }
            }

            if let Some(Err(err)) = page.value().map(|value| page.validate_value(value)) {
                problem = Some(err);
            }
        });

        match problem {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl FromIterator<Page> for PageList {
    fn from_iter<I: IntoIterator<Item = Page>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a PageList {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
