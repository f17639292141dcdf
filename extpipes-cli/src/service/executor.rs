//! Plan execution
//!
//! Applies a prepared deployment phase by phase:
//! RAW tables, deletions, creations, updates, then config revisions.
//! A failing phase aborts the run; phases already applied stay applied.

use extpipes_core::dto::extpipe::{CreateConfigRevision, CreateExtpipe, ExtpipeUpdate};
use tracing::{info, warn};

use super::raw_tables::create_missing_tables;
use super::reconcile::Deployment;
use crate::error::{DeployError, Phase};
use crate::repository::CdfRepository;

/// Counts of what a run changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub tables_created: usize,
    pub deleted: usize,
    pub created: usize,
    pub updated: usize,
    pub config_revisions: usize,
}

/// Apply `deployment`, or only report it when `dry_run` is set
pub async fn execute(
    repo: &dyn CdfRepository,
    deployment: &Deployment,
    dry_run: bool,
) -> Result<ExecutionSummary, DeployError> {
    if dry_run {
        warn!("Dry run detected. No changes to be applied to the project.");
        return Ok(ExecutionSummary::default());
    }

    info!("Applying configuration");
    let plan = &deployment.plan;
    let mut summary = ExecutionSummary::default();

    if !deployment.raw_tables.is_empty() {
        summary.tables_created = create_missing_tables(repo, &deployment.raw_tables).await?;
    }

    if !plan.delete.is_empty() {
        let external_ids: Vec<String> = plan.delete.iter().cloned().collect();
        repo.delete_extpipes(&external_ids)
            .await
            .map_err(DeployError::remote(Phase::Delete))?;
        summary.deleted = external_ids.len();
        info!("Extraction pipelines deleted: {}", summary.deleted);
    }

    let creates: Vec<CreateExtpipe> = plan
        .create
        .iter()
        .filter_map(|id| deployment.drafts.get(id))
        .map(CreateExtpipe::from)
        .collect();
    if !creates.is_empty() {
        let created = repo
            .create_extpipes(&creates)
            .await
            .map_err(DeployError::remote(Phase::Create))?;
        summary.created = created.len();
        info!("Extraction pipelines created: {}", summary.created);
    }

    let updates: Vec<ExtpipeUpdate> = plan
        .update
        .iter()
        .filter_map(|id| deployment.drafts.get(id))
        .map(ExtpipeUpdate::from)
        .collect();
    if !updates.is_empty() {
        let updated = repo
            .update_extpipes(&updates)
            .await
            .map_err(DeployError::remote(Phase::Update))?;
        summary.updated = updated.len();
        info!("Extraction pipelines updated: {}", summary.updated);
    }

    for external_id in plan.create.iter().chain(plan.update.iter()) {
        let Some(draft) = deployment.drafts.get(external_id) else {
            continue;
        };
        let Some(config) = &draft.configuration else {
            continue;
        };

        let revision = CreateConfigRevision {
            external_id: external_id.clone(),
            config: config.clone(),
            description: None,
        };
        repo.create_config_revision(&revision)
            .await
            .map_err(DeployError::remote(Phase::ConfigRevisions))?;
        summary.config_revisions += 1;
    }
    if summary.config_revisions > 0 {
        info!("Config revisions pushed: {}", summary.config_revisions);
    }

    Ok(summary)
}
