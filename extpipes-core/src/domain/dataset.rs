//! Dataset domain types

use serde::{Deserialize, Serialize};

/// A dataset as returned by the API
///
/// Only the numeric handle and the external identifier matter for deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSet {
    pub id: i64,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
