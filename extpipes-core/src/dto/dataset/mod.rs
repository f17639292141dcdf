//! Dataset DTOs

use serde::{Deserialize, Serialize};

use super::ExternalId;

/// Request body for retrieving datasets by external id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveDataSets {
    pub items: Vec<ExternalId>,
    pub ignore_unknown_ids: bool,
}

impl RetrieveDataSets {
    /// Lookup that returns the found subset instead of failing on unknown ids
    pub fn lenient<'a>(external_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            items: external_ids.into_iter().map(ExternalId::new).collect(),
            ignore_unknown_ids: true,
        }
    }
}
