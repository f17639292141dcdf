//! In-memory project used by the engine tests

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use extpipes_client::{ClientError, Result};
use extpipes_core::domain::dataset::DataSet;
use extpipes_core::domain::extpipe::RemoteExtpipe;
use extpipes_core::domain::raw::{RawDatabase, RawTable};
use extpipes_core::dto::extpipe::{
    CreateConfigRevision, CreateExtpipe, ExtpipeUpdate, FieldUpdate,
};

use super::CdfRepository;

/// A remote call as observed by the in-memory project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListExtpipes,
    CreateExtpipes(Vec<String>),
    UpdateExtpipes(Vec<String>),
    DeleteExtpipes(Vec<String>),
    ConfigRevision(String),
    RetrieveDatasets(Vec<String>),
    ListRawDatabases,
    ListRawTables(String),
    CreateRawTables(String, Vec<String>),
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::ListExtpipes => "list_extpipes",
            Call::CreateExtpipes(_) => "create_extpipes",
            Call::UpdateExtpipes(_) => "update_extpipes",
            Call::DeleteExtpipes(_) => "delete_extpipes",
            Call::ConfigRevision(_) => "create_config_revision",
            Call::RetrieveDatasets(_) => "retrieve_datasets",
            Call::ListRawDatabases => "list_raw_databases",
            Call::ListRawTables(_) => "list_raw_tables",
            Call::CreateRawTables(..) => "create_raw_tables",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::CreateExtpipes(_)
                | Call::UpdateExtpipes(_)
                | Call::DeleteExtpipes(_)
                | Call::ConfigRevision(_)
                | Call::CreateRawTables(..)
        )
    }
}

#[derive(Default)]
struct State {
    extpipes: BTreeMap<String, RemoteExtpipe>,
    datasets: BTreeMap<String, i64>,
    raw: BTreeMap<String, BTreeSet<String>>,
    revisions: BTreeMap<String, Vec<String>>,
    calls: Vec<Call>,
    next_id: i64,
}

/// Project state held in memory, recording every call made against it
#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
    fail_on: Option<&'static str>,
}

/// Remote pipeline with only the required fields set
pub fn remote_extpipe(external_id: &str, data_set_id: i64) -> RemoteExtpipe {
    RemoteExtpipe {
        id: None,
        external_id: external_id.to_string(),
        name: external_id.to_string(),
        description: None,
        data_set_id,
        raw_tables: vec![],
        schedule: None,
        contacts: vec![],
        metadata: BTreeMap::new(),
        source: None,
        documentation: None,
        created_by: None,
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(self, external_id: &str, id: i64) -> Self {
        self.state
            .lock()
            .unwrap()
            .datasets
            .insert(external_id.to_string(), id);
        self
    }

    pub fn with_raw_database(self, db_name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .raw
            .entry(db_name.to_string())
            .or_default();
        self
    }

    pub fn with_raw_table(self, db_name: &str, table_name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .raw
            .entry(db_name.to_string())
            .or_default()
            .insert(table_name.to_string());
        self
    }

    pub fn with_extpipe(self, extpipe: RemoteExtpipe) -> Self {
        self.state
            .lock()
            .unwrap()
            .extpipes
            .insert(extpipe.external_id.clone(), extpipe);
        self
    }

    /// Make every call with the given name fail with a server error
    pub fn failing_on(mut self, call_name: &'static str) -> Self {
        self.fail_on = Some(call_name);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn extpipe(&self, external_id: &str) -> Option<RemoteExtpipe> {
        self.state.lock().unwrap().extpipes.get(external_id).cloned()
    }

    pub fn extpipe_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().extpipes.keys().cloned().collect()
    }

    pub fn raw_tables(&self, db_name: &str) -> BTreeSet<String> {
        self.state
            .lock()
            .unwrap()
            .raw
            .get(db_name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn revisions(&self, external_id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .revisions
            .get(external_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Record the call, then fail it if it was configured to fail
    fn record(&self, state: &mut State, call: Call) -> Result<()> {
        let name = call.name();
        state.calls.push(call);
        if self.fail_on == Some(name) {
            return Err(ClientError::api_error(500, format!("{} failed", name)));
        }
        Ok(())
    }
}

fn apply_patch(remote: &mut RemoteExtpipe, item: &ExtpipeUpdate) {
    fn optional<T: Clone>(update: &FieldUpdate<T>) -> Option<T> {
        match update {
            FieldUpdate::Set { set } => Some(set.clone()),
            FieldUpdate::SetNull { .. } => None,
        }
    }

    let patch = &item.update;
    if let Some(name) = optional(&patch.name) {
        remote.name = name;
    }
    if let Some(data_set_id) = optional(&patch.data_set_id) {
        remote.data_set_id = data_set_id;
    }
    remote.description = optional(&patch.description);
    remote.raw_tables = optional(&patch.raw_tables).unwrap_or_default();
    remote.schedule = optional(&patch.schedule);
    remote.contacts = optional(&patch.contacts).unwrap_or_default();
    remote.metadata = optional(&patch.metadata).unwrap_or_default();
    remote.source = optional(&patch.source);
    remote.documentation = optional(&patch.documentation);
}

#[async_trait]
impl CdfRepository for InMemoryRepository {
    async fn list_extpipes(&self) -> Result<Vec<RemoteExtpipe>> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, Call::ListExtpipes)?;
        Ok(state.extpipes.values().cloned().collect())
    }

    async fn create_extpipes(&self, items: &[CreateExtpipe]) -> Result<Vec<RemoteExtpipe>> {
        let mut state = self.state.lock().unwrap();
        let ids = items.iter().map(|item| item.external_id.clone()).collect();
        self.record(&mut state, Call::CreateExtpipes(ids))?;

        let mut created = Vec::new();
        for item in items {
            if state.extpipes.contains_key(&item.external_id) {
                return Err(ClientError::api_error(
                    409,
                    format!("Duplicated external id: {}", item.external_id),
                ));
            }
            state.next_id += 1;
            let remote = RemoteExtpipe {
                id: Some(state.next_id),
                external_id: item.external_id.clone(),
                name: item.name.clone(),
                description: item.description.clone(),
                data_set_id: item.data_set_id,
                raw_tables: item.raw_tables.clone(),
                schedule: item.schedule.clone(),
                contacts: item.contacts.clone(),
                metadata: item.metadata.clone(),
                source: item.source.clone(),
                documentation: item.documentation.clone(),
                created_by: item.created_by.clone(),
            };
            state.extpipes.insert(remote.external_id.clone(), remote.clone());
            created.push(remote);
        }
        Ok(created)
    }

    async fn update_extpipes(&self, items: &[ExtpipeUpdate]) -> Result<Vec<RemoteExtpipe>> {
        let mut state = self.state.lock().unwrap();
        let ids = items.iter().map(|item| item.external_id.clone()).collect();
        self.record(&mut state, Call::UpdateExtpipes(ids))?;

        let mut updated = Vec::new();
        for item in items {
            let remote = state.extpipes.get_mut(&item.external_id).ok_or_else(|| {
                ClientError::api_error(400, format!("Unknown external id: {}", item.external_id))
            })?;
            apply_patch(remote, item);
            updated.push(remote.clone());
        }
        Ok(updated)
    }

    async fn delete_extpipes(&self, external_ids: &[String]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, Call::DeleteExtpipes(external_ids.to_vec()))?;
        for external_id in external_ids {
            state.extpipes.remove(external_id);
        }
        Ok(())
    }

    async fn create_config_revision(&self, revision: &CreateConfigRevision) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, Call::ConfigRevision(revision.external_id.clone()))?;
        state
            .revisions
            .entry(revision.external_id.clone())
            .or_default()
            .push(revision.config.clone());
        Ok(())
    }

    async fn retrieve_datasets(&self, external_ids: &[String]) -> Result<Vec<DataSet>> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, Call::RetrieveDatasets(external_ids.to_vec()))?;

        let missing: Vec<String> = external_ids
            .iter()
            .filter(|id| !state.datasets.contains_key(*id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ClientError::NotFound(missing));
        }

        Ok(external_ids
            .iter()
            .map(|id| DataSet {
                id: state.datasets[id],
                external_id: Some(id.clone()),
                name: None,
            })
            .collect())
    }

    async fn list_raw_databases(&self) -> Result<Vec<RawDatabase>> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, Call::ListRawDatabases)?;
        Ok(state
            .raw
            .keys()
            .map(|name| RawDatabase { name: name.clone() })
            .collect())
    }

    async fn list_raw_tables(&self, db_name: &str) -> Result<Vec<RawTable>> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, Call::ListRawTables(db_name.to_string()))?;
        let tables = state.raw.get(db_name).ok_or_else(|| {
            ClientError::api_error(404, format!("Database not found: {}", db_name))
        })?;
        Ok(tables
            .iter()
            .map(|name| RawTable { name: name.clone() })
            .collect())
    }

    async fn create_raw_tables(
        &self,
        db_name: &str,
        table_names: &[String],
    ) -> Result<Vec<RawTable>> {
        let mut state = self.state.lock().unwrap();
        self.record(
            &mut state,
            Call::CreateRawTables(db_name.to_string(), table_names.to_vec()),
        )?;
        let tables = state.raw.get_mut(db_name).ok_or_else(|| {
            ClientError::api_error(404, format!("Database not found: {}", db_name))
        })?;
        tables.extend(table_names.iter().cloned());
        Ok(table_names
            .iter()
            .map(|name| RawTable { name: name.clone() })
            .collect())
    }
}
