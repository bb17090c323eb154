//! Wizard Model
//!
//! Owns the page tree, the listeners observing it and the current choices.
//! A concrete wizard is described by a [`WizardDefinition`], which builds the
//! root page list once when the model is created.

use crate::data::{Value, VALUE_KEY};
use crate::error::{Result, WizardError};
use crate::listeners::{ListenerId, ListenerRegistry, ModelCallbacks};
use crate::page::Page;
use crate::page_list::PageList;
use crate::review::ReviewItem;
use crate::state::SavedState;
use crate::strings::Strings;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// Describes the shape of a wizard
pub trait WizardDefinition {
    /// Build the root page list; titles may be resolved through `strings`
    fn root_page_list(&self, strings: &dyn Strings) -> Result<PageList>;
}

#[derive(Debug)]
pub struct WizardModel {
    root: PageList,
    listeners: ListenerRegistry,
}

impl WizardModel {
    /// Build the model from `definition`, rejecting malformed trees
    pub fn new(definition: &impl WizardDefinition, strings: &dyn Strings) -> Result<Self> {
        Self::from_page_list(definition.root_page_list(strings)?)
    }

    pub fn from_page_list(root: PageList) -> Result<Self> {
        root.validate()?;
        debug!("Built wizard model with {} top-level pages", root.len());

        Ok(Self {
            root,
            listeners: ListenerRegistry::default(),
        })
    }

    pub fn root(&self) -> &PageList {
        &self.root
    }

    /// Reverse the order of the top-level pages
    pub fn reverse_pages(&mut self) {
        self.root.reverse();
        self.notify_page_tree_changed();
    }

    pub fn find_by_key(&self, key: &str) -> Option<&Page> {
        self.root.find_by_key(key)
    }

    /// The current list of steps, flattening branch pages by their choices
    pub fn current_page_sequence(&self) -> Vec<&Page> {
        let mut flattened = Vec::new();
        self.root.flatten_current_page_sequence(&mut flattened);
        flattened
    }

    /// Store the primary value of page `key` and notify listeners
    ///
    /// Branch pages fire a tree change before the data change since the set
    /// of active pages may differ afterwards.
    pub fn set_value(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let page = self.page_mut(key)?;
        page.set_value(value)?;
        let is_branch = page.is_branch();

        debug!("Page '{}' value set", key);
        self.notify_changed(key, is_branch);
        Ok(())
    }

    pub fn clear_value(&mut self, key: &str) -> Result<()> {
        let page = self.page_mut(key)?;
        page.clear_value();
        let is_branch = page.is_branch();

        debug!("Page '{}' value cleared", key);
        self.notify_changed(key, is_branch);
        Ok(())
    }

    /// Store a secondary data entry of page `key`
    ///
    /// Writes to [`VALUE_KEY`] are routed through [`Self::set_value`].
    pub fn set_entry(&mut self, key: &str, name: &str, value: impl Into<Value>) -> Result<()> {
        if name == VALUE_KEY {
            return self.set_value(key, value);
        }

        let page = self.page_mut(key)?;
        let mut data = page.data().clone();
        data.insert(name, value);
        page.reset_data(data);

        self.notify_page_data_changed(key);
        Ok(())
    }

    /// Restore page data from `saved`
    ///
    /// Only pages present in both the tree and `saved` are touched; unknown
    /// keys are ignored. One tree change is fired afterwards.
    pub fn load(&mut self, saved: &SavedState) {
        for (key, data) in saved.iter() {
            let Some(page) = self.root.find_by_key_mut(key) else {
                debug!("Ignoring saved data for unknown page '{}'", key);
                continue;
            };

            page.reset_data(data.clone());

            if page.is_branch()
                && page.selected_branch().is_none()
                && page.value().is_some_and(|v| !v.is_empty())
            {
                warn!(
                    "Saved value of branch page '{}' names no branch; its pages stay hidden",
                    key
                );
            }
        }

        self.notify_page_tree_changed();
    }

    /// Collect the data bags of every page in the current sequence
    pub fn save(&self) -> SavedState {
        let mut saved = SavedState::new();
        for page in self.current_page_sequence() {
            saved.insert(page.key(), page.data().clone());
        }
        saved
    }

    /// Review summary of the current sequence, stably sorted by weight
    pub fn review_items(&self) -> Vec<ReviewItem> {
        let mut items = Vec::new();
        for page in self.current_page_sequence() {
            page.review_items(&mut items);
        }
        items.sort_by_key(|item| item.weight);
        items
    }

    /// First required page of the current sequence that is not completed
    pub fn first_blocking_page(&self) -> Option<&Page> {
        self.current_page_sequence()
            .into_iter()
            .find(|page| page.is_required() && !page.is_completed())
    }

    /// Whether every required page of the current sequence is completed
    pub fn is_complete(&self) -> bool {
        self.first_blocking_page().is_none()
    }

    /// Register a listener; the model keeps only a weak reference
    pub fn register_listener<L: ModelCallbacks + 'static>(&self, listener: &Rc<L>) -> ListenerId {
        self.listeners
            .register(Rc::downgrade(listener) as Weak<dyn ModelCallbacks>)
    }

    /// Returns `false` when `id` was not registered
    pub fn unregister_listener(&self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn notify_page_data_changed(&self, key: &str) {
        let Some(page) = self.find_by_key(key) else {
            return;
        };

        debug!("Notifying listeners: page '{}' data changed", key);
        self.listeners
            .for_each(|listener| listener.on_page_data_changed(self, page));
    }

    pub fn notify_page_tree_changed(&self) {
        debug!("Notifying listeners: page tree changed");
        self.listeners
            .for_each(|listener| listener.on_page_tree_changed(self));
    }

    fn notify_changed(&self, key: &str, tree_changed: bool) {
        if tree_changed {
            self.notify_page_tree_changed();
        }
        self.notify_page_data_changed(key);
    }

    fn page_mut(&mut self, key: &str) -> Result<&mut Page> {
        self.root
            .find_by_key_mut(key)
            .ok_or_else(|| WizardError::PageNotFound(key.to_string()))
    }
}
