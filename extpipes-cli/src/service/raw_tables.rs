//! RAW table provisioning
//!
//! Pipelines declare the RAW tables they write to. Missing tables are created
//! before pipelines are deployed; tables are never deleted. RAW databases are
//! provisioned elsewhere, so a missing database is a hard failure.

use std::collections::{BTreeMap, BTreeSet};

use extpipes_core::domain::extpipe::RawTableRef;
use tracing::{debug, info};

use crate::error::{DeployError, Phase};
use crate::repository::CdfRepository;

/// Table names grouped by database
pub type TableSet = BTreeMap<String, BTreeSet<String>>;

/// Tables that must be created, grouped by database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTablePlan {
    pub missing: TableSet,
}

impl RawTablePlan {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn table_count(&self) -> usize {
        self.missing.values().map(BTreeSet::len).sum()
    }
}

/// Union of the declared table references
pub fn desired_tables<'a>(refs: impl IntoIterator<Item = &'a RawTableRef>) -> TableSet {
    let mut desired = TableSet::new();
    for table in refs {
        desired
            .entry(table.db_name.clone())
            .or_default()
            .insert(table.table_name.clone());
    }
    desired
}

/// Compare desired tables with the project, without changing anything
///
/// # Errors
/// `DependencyMissing` naming every database that does not exist.
pub async fn plan_raw_tables(
    repo: &dyn CdfRepository,
    desired: &TableSet,
) -> Result<RawTablePlan, DeployError> {
    if desired.is_empty() {
        return Ok(RawTablePlan::default());
    }

    let databases: BTreeSet<String> = repo
        .list_raw_databases()
        .await
        .map_err(DeployError::remote(Phase::RawListing))?
        .into_iter()
        .map(|db| db.name)
        .collect();

    let missing_databases: Vec<String> = desired
        .keys()
        .filter(|db| !databases.contains(*db))
        .cloned()
        .collect();
    if !missing_databases.is_empty() {
        return Err(DeployError::DependencyMissing {
            kind: "RAW database",
            missing: missing_databases,
        });
    }

    let mut missing = TableSet::new();
    for (db_name, tables) in desired {
        let existing: BTreeSet<String> = repo
            .list_raw_tables(db_name)
            .await
            .map_err(DeployError::remote(Phase::RawListing))?
            .into_iter()
            .map(|table| table.name)
            .collect();

        let absent: BTreeSet<String> = tables.difference(&existing).cloned().collect();
        if !absent.is_empty() {
            debug!(db = %db_name, count = absent.len(), "RAW tables missing");
            missing.insert(db_name.clone(), absent);
        }
    }

    Ok(RawTablePlan { missing })
}

/// Create every table of the plan, one request per database
///
/// Returns the number of tables created.
pub async fn create_missing_tables(
    repo: &dyn CdfRepository,
    plan: &RawTablePlan,
) -> Result<usize, DeployError> {
    let mut created = 0;
    for (db_name, tables) in &plan.missing {
        let names: Vec<String> = tables.iter().cloned().collect();
        repo.create_raw_tables(db_name, &names)
            .await
            .map_err(DeployError::remote(Phase::CreateRawTables))?;
        info!("RAW tables created in '{}': {}", db_name, names.join(", "));
        created += names.len();
    }
    Ok(created)
}
