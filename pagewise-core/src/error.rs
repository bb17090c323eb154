//! Wizard Errors
//!
//! Typed errors raised while building or mutating a wizard model.

use thiserror::Error;

/// Errors produced by the page tree and the wizard model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// Two pages anywhere in the tree share a key
    #[error("duplicate page key '{0}'")]
    DuplicateKey(String),

    /// A branch page registered the same choice label twice
    #[error("branch page '{page}' registers choice '{choice}' more than once")]
    DuplicateBranch { page: String, choice: String },

    /// A page was declared with an empty key
    #[error("page titled '{title}' has an empty key")]
    EmptyKey { title: String },

    /// No page with this key exists in the tree
    #[error("no page with key '{0}'")]
    PageNotFound(String),

    /// A choice page received a value outside its fixed choices
    #[error("'{value}' is not a choice of page '{page}'")]
    InvalidChoice { page: String, value: String },

    /// The value kind does not fit the page kind
    #[error("page '{page}' does not accept {kind} values")]
    UnsupportedValue { page: String, kind: &'static str },

    /// A title referenced a string id that the string table does not have
    #[error("unknown string id '@{0}'")]
    MissingString(String),
}

pub type Result<T> = std::result::Result<T, WizardError>;
