//! RAW storage API endpoints

use extpipes_core::domain::raw::{RawDatabase, RawTable};
use extpipes_core::dto::Items;
use extpipes_core::dto::raw::CreateRawTable;
use tracing::debug;

use crate::error::Result;
use crate::{Batch, CdfClient, MAX_ITEMS_PER_REQUEST};

impl CdfClient {
    // =============================================================================
    // RAW Storage
    // =============================================================================

    /// List every RAW database in the project
    pub async fn list_raw_databases(&self) -> Result<Vec<RawDatabase>> {
        self.list_all(&["raw", "dbs"]).await
    }

    /// List every table of one RAW database
    pub async fn list_raw_tables(&self, db_name: &str) -> Result<Vec<RawTable>> {
        self.list_all(&["raw", "dbs", db_name, "tables"]).await
    }

    /// Create tables inside an existing RAW database
    ///
    /// The database itself is never created implicitly.
    pub async fn create_raw_tables(
        &self,
        db_name: &str,
        table_names: &[String],
    ) -> Result<Vec<RawTable>> {
        let items: Vec<CreateRawTable> = table_names
            .iter()
            .map(|name| CreateRawTable { name: name.clone() })
            .collect();

        let mut created = Vec::with_capacity(items.len());
        for chunk in items.chunks(MAX_ITEMS_PER_REQUEST) {
            debug!(db = db_name, count = chunk.len(), "Creating RAW tables");
            let response: Items<RawTable> = self
                .post_json(&["raw", "dbs", db_name, "tables"], &Batch { items: chunk })
                .await?;
            created.extend(response.items);
        }
        Ok(created)
    }
}
