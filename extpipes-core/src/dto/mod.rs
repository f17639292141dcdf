//! Data Transfer Objects for the data-platform API
//!
//! Request and response envelopes plus the payloads sent when creating or
//! updating resources. Domain types that travel unchanged (contacts, RAW table
//! references) are reused directly.

pub mod dataset;
pub mod extpipe;
pub mod raw;

use serde::{Deserialize, Serialize};

/// `{"items": [...]}` envelope used by every batch endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

impl<T> Items<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

/// One page of a cursor-paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Identifies a resource by external id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalId {
    pub external_id: String,
}

impl ExternalId {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
        }
    }
}
