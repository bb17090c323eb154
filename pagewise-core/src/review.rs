//! Review Items
//!
//! Human-readable summary entries produced by pages for a final review step.

use serde::Serialize;

/// One line of the review summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub title: String,
    pub display_value: String,
    pub page_key: String,
    /// Sort weight; lower weights are listed first
    pub weight: i32,
}

impl ReviewItem {
    pub fn new(
        title: impl Into<String>,
        display_value: impl Into<String>,
        page_key: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            display_value: display_value.into(),
            page_key: page_key.into(),
            weight: 0,
        }
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }
}
