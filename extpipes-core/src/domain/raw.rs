//! RAW storage domain types

use serde::{Deserialize, Serialize};

/// A RAW database as listed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDatabase {
    pub name: String,
}

/// A RAW table as listed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub name: String,
}
