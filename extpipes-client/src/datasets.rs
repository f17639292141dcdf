//! Dataset API endpoints

use std::collections::BTreeSet;

use extpipes_core::domain::dataset::DataSet;
use extpipes_core::dto::Items;
use extpipes_core::dto::dataset::RetrieveDataSets;

use crate::error::{ClientError, Result};
use crate::{CdfClient, MAX_ITEMS_PER_REQUEST};

impl CdfClient {
    // =============================================================================
    // Datasets
    // =============================================================================

    /// Look up datasets by external id
    ///
    /// # Errors
    /// Returns `ClientError::NotFound` listing every requested id the project
    /// does not contain.
    pub async fn retrieve_datasets(&self, external_ids: &[String]) -> Result<Vec<DataSet>> {
        let mut found = Vec::with_capacity(external_ids.len());
        for chunk in external_ids.chunks(MAX_ITEMS_PER_REQUEST) {
            let body = RetrieveDataSets::lenient(chunk.iter().map(String::as_str));
            let response: Items<DataSet> = self.post_json(&["datasets", "byids"], &body).await?;
            found.extend(response.items);
        }

        let returned: BTreeSet<&str> = found
            .iter()
            .filter_map(|dataset| dataset.external_id.as_deref())
            .collect();
        let missing: BTreeSet<&String> = external_ids
            .iter()
            .filter(|id| !returned.contains(id.as_str()))
            .collect();

        if !missing.is_empty() {
            return Err(ClientError::NotFound(missing.into_iter().cloned().collect()));
        }

        Ok(found)
    }
}
