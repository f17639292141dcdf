//! Extraction pipeline API endpoints

use extpipes_core::domain::extpipe::RemoteExtpipe;
use extpipes_core::dto::extpipe::{CreateConfigRevision, CreateExtpipe, ExtpipeUpdate};
use extpipes_core::dto::{ExternalId, Items};
use tracing::debug;

use crate::error::Result;
use crate::{Batch, CdfClient, MAX_ITEMS_PER_REQUEST};

impl CdfClient {
    // =============================================================================
    // Extraction Pipelines
    // =============================================================================

    /// List every extraction pipeline in the project
    ///
    /// Follows `nextCursor` until the listing is exhausted.
    pub async fn list_extpipes(&self) -> Result<Vec<RemoteExtpipe>> {
        self.list_all(&["extpipes"]).await
    }

    /// Create extraction pipelines
    ///
    /// Requests are split into batches of at most [`MAX_ITEMS_PER_REQUEST`].
    ///
    /// # Returns
    /// The created pipelines as echoed by the API
    pub async fn create_extpipes(&self, items: &[CreateExtpipe]) -> Result<Vec<RemoteExtpipe>> {
        let mut created = Vec::with_capacity(items.len());
        for chunk in items.chunks(MAX_ITEMS_PER_REQUEST) {
            debug!(count = chunk.len(), "Creating extraction pipelines");
            let response: Items<RemoteExtpipe> =
                self.post_json(&["extpipes"], &Batch { items: chunk }).await?;
            created.extend(response.items);
        }
        Ok(created)
    }

    /// Apply full-replace patches to existing extraction pipelines
    pub async fn update_extpipes(&self, items: &[ExtpipeUpdate]) -> Result<Vec<RemoteExtpipe>> {
        let mut updated = Vec::with_capacity(items.len());
        for chunk in items.chunks(MAX_ITEMS_PER_REQUEST) {
            debug!(count = chunk.len(), "Updating extraction pipelines");
            let response: Items<RemoteExtpipe> = self
                .post_json(&["extpipes", "update"], &Batch { items: chunk })
                .await?;
            updated.extend(response.items);
        }
        Ok(updated)
    }

    /// Delete extraction pipelines by external id
    pub async fn delete_extpipes(&self, external_ids: &[String]) -> Result<()> {
        for chunk in external_ids.chunks(MAX_ITEMS_PER_REQUEST) {
            debug!(count = chunk.len(), "Deleting extraction pipelines");
            let body = Items::new(chunk.iter().map(ExternalId::new).collect());
            self.post_json_empty(&["extpipes", "delete"], &body).await?;
        }
        Ok(())
    }

    /// Push a new configuration revision for one pipeline
    pub async fn create_config_revision(&self, revision: &CreateConfigRevision) -> Result<()> {
        debug!(external_id = %revision.external_id, "Pushing config revision");
        self.post_json_empty(&["extpipes", "config"], revision).await
    }
}
