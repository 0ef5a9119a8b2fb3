// src/api/filter.rs
//! Which database rows are eligible for export.

use crate::model::PageRecord;
use serde_json::{json, Value};

/// Selects rows that are finished but not yet published:
/// `published != true AND done == true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationFilter {
    pub published_property: String,
    pub done_property: String,
}

impl Default for PublicationFilter {
    fn default() -> Self {
        Self::done_unpublished()
    }
}

impl PublicationFilter {
    pub fn done_unpublished() -> Self {
        Self {
            published_property: "published".to_string(),
            done_property: "done".to_string(),
        }
    }

    /// Compound filter object for the database query endpoint.
    pub fn to_query_filter(&self) -> Value {
        json!({
            "and": [
                {
                    "property": self.published_property,
                    "checkbox": { "does_not_equal": true }
                },
                {
                    "property": self.done_property,
                    "checkbox": { "equals": true }
                }
            ]
        })
    }

    /// The same predicate evaluated locally.
    pub fn admits(&self, published: bool, done: bool) -> bool {
        !published && done
    }

    pub fn admits_record(&self, record: &PageRecord) -> bool {
        self.admits(
            record.checkbox(&self.published_property),
            record.checkbox(&self.done_property),
        )
    }
}
