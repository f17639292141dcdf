//! Repository layer
//!
//! The reconciliation services talk to the data platform exclusively through
//! [`CdfRepository`]. The HTTP implementation wraps the shared client; tests
//! substitute an in-memory project that records every call.

mod http;
#[cfg(test)]
pub mod memory;

pub use http::HttpCdfRepository;

use async_trait::async_trait;
use extpipes_client::Result;
use extpipes_core::domain::dataset::DataSet;
use extpipes_core::domain::extpipe::RemoteExtpipe;
use extpipes_core::domain::raw::{RawDatabase, RawTable};
use extpipes_core::dto::extpipe::{CreateConfigRevision, CreateExtpipe, ExtpipeUpdate};

/// Remote operations needed to reconcile extraction pipelines
#[async_trait]
pub trait CdfRepository: Send + Sync {
    /// Lists every extraction pipeline in the project
    async fn list_extpipes(&self) -> Result<Vec<RemoteExtpipe>>;

    /// Creates pipelines in one logical batch
    async fn create_extpipes(&self, items: &[CreateExtpipe]) -> Result<Vec<RemoteExtpipe>>;

    /// Replaces every updatable field of existing pipelines
    async fn update_extpipes(&self, items: &[ExtpipeUpdate]) -> Result<Vec<RemoteExtpipe>>;

    /// Deletes pipelines by external id
    async fn delete_extpipes(&self, external_ids: &[String]) -> Result<()>;

    /// Pushes a config revision for one pipeline
    async fn create_config_revision(&self, revision: &CreateConfigRevision) -> Result<()>;

    /// Looks up datasets by external id
    ///
    /// Fails with `ClientError::NotFound` listing every unknown id.
    async fn retrieve_datasets(&self, external_ids: &[String]) -> Result<Vec<DataSet>>;

    async fn list_raw_databases(&self) -> Result<Vec<RawDatabase>>;

    async fn list_raw_tables(&self, db_name: &str) -> Result<Vec<RawTable>>;

    /// Creates tables in an existing RAW database
    async fn create_raw_tables(
        &self,
        db_name: &str,
        table_names: &[String],
    ) -> Result<Vec<RawTable>>;
}
