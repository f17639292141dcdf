//! HTTP implementation of the repository

use async_trait::async_trait;
use extpipes_client::{CdfClient, Result};
use extpipes_core::domain::dataset::DataSet;
use extpipes_core::domain::extpipe::RemoteExtpipe;
use extpipes_core::domain::raw::{RawDatabase, RawTable};
use extpipes_core::dto::extpipe::{CreateConfigRevision, CreateExtpipe, ExtpipeUpdate};

use super::CdfRepository;

/// Repository backed by the REST API of one project
pub struct HttpCdfRepository {
    client: CdfClient,
}

impl HttpCdfRepository {
    /// Creates a repository from an authenticated client
    pub fn new(client: CdfClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CdfRepository for HttpCdfRepository {
    async fn list_extpipes(&self) -> Result<Vec<RemoteExtpipe>> {
        self.client.list_extpipes().await
    }

    async fn create_extpipes(&self, items: &[CreateExtpipe]) -> Result<Vec<RemoteExtpipe>> {
        self.client.create_extpipes(items).await
    }

    async fn update_extpipes(&self, items: &[ExtpipeUpdate]) -> Result<Vec<RemoteExtpipe>> {
        self.client.update_extpipes(items).await
    }

    async fn delete_extpipes(&self, external_ids: &[String]) -> Result<()> {
        self.client.delete_extpipes(external_ids).await
    }

    async fn create_config_revision(&self, revision: &CreateConfigRevision) -> Result<()> {
        self.client.create_config_revision(revision).await
    }

    async fn retrieve_datasets(&self, external_ids: &[String]) -> Result<Vec<DataSet>> {
        self.client.retrieve_datasets(external_ids).await
    }

    async fn list_raw_databases(&self) -> Result<Vec<RawDatabase>> {
        self.client.list_raw_databases().await
    }

    async fn list_raw_tables(&self, db_name: &str) -> Result<Vec<RawTable>> {
        self.client.list_raw_tables(db_name).await
    }

    async fn create_raw_tables(
        &self,
        db_name: &str,
        table_names: &[String],
    ) -> Result<Vec<RawTable>> {
        self.client.create_raw_tables(db_name, table_names).await
    }
}
