//! Pagewise Core Library
//!
//! A wizard model built from ordered pages. This crate provides:
//! - Page kinds, page lists and branch pages
//! - Flattening of the page tree into the currently active step sequence
//! - Listener fan-out for data and tree changes
//! - Saving and restoring page data
//! - Declarative wizard definitions (wizard.toml)
//!
//! This crate has NO terminal or UI dependencies.

pub mod branch;
pub mod config;
pub mod data;
pub mod error;
pub mod listeners;
pub mod model;
pub mod page;
pub mod page_list;
pub mod review;
pub mod state;
pub mod strings;

pub use branch::{Branch, BranchPage};
pub use data::{PageData, Value, VALUE_KEY};
pub use error::WizardError;
pub use listeners::{ListenerId, ModelCallbacks};
pub use model::{WizardDefinition, WizardModel};
pub use page::{Page, PageKind, Screen};
pub use page_list::PageList;
pub use review::ReviewItem;
pub use state::SavedState;
pub use strings::{NoStrings, StringTable, Strings};
