//! RAW DTOs

use serde::{Deserialize, Serialize};

/// Request item for creating a RAW table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRawTable {
    pub name: String,
}
