//! End-to-end reconciliation
//!
//! Validation, identifier rendering, dataset resolution, planning and RAW table
//! checks only read from the project. They all run before the dry-run gate, so
//! a dry run reports the same errors a real run would.

use std::collections::BTreeMap;

use extpipes_core::domain::config::{ExtpipesConfig, pipeline_label};
use extpipes_core::domain::extpipe::{ExtpipeDraft, RemoteExtpipe};
use extpipes_core::error::ConfigError;
use tracing::{debug, info};

use super::executor::{self, ExecutionSummary};
use super::planner::{self, ReconcilePlan};
use super::raw_tables::{RawTablePlan, desired_tables, plan_raw_tables};
use super::renderer::{Identity, MAX_DESCRIPTION_CHARS, render_identities, truncate_field};
use super::resolver::DataSetResolver;
use crate::error::{DeployError, Phase};
use crate::repository::CdfRepository;

/// Everything needed to apply one run, computed without side effects
#[derive(Debug, Clone, Default)]
pub struct Deployment {
    /// Desired pipelines keyed by external id
    pub drafts: BTreeMap<String, ExtpipeDraft>,
    /// Remote pipelines keyed by external id
    pub existing: BTreeMap<String, RemoteExtpipe>,
    pub plan: ReconcilePlan,
    pub raw_tables: RawTablePlan,
}

impl Deployment {
    /// Fields an update would change for `external_id`
    pub fn changed_fields(&self, external_id: &str) -> Vec<&'static str> {
        match (self.drafts.get(external_id), self.existing.get(external_id)) {
            (Some(draft), Some(remote)) => draft.changed_fields(remote),
            _ => Vec::new(),
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub deployment: Deployment,
    pub summary: ExecutionSummary,
    pub dry_run: bool,
}

/// Validate, resolve and plan without changing the project
pub async fn prepare(
    repo: &dyn CdfRepository,
    config: &ExtpipesConfig,
) -> Result<Deployment, DeployError> {
    config.validate()?;
    let identities = render_identities(config)?;

    let mut resolver = DataSetResolver::new(repo);
    let data_sets = resolver
        .resolve_all(
            config
                .pipelines
                .iter()
                .map(|pipeline| pipeline.data_set_external_id.as_str()),
        )
        .await?;

    let drafts = build_drafts(config, identities, &data_sets)?;
    debug!("Requested extraction pipelines: {:?}", drafts.keys());

    let existing: BTreeMap<String, RemoteExtpipe> = repo
        .list_extpipes()
        .await
        .map_err(DeployError::remote(Phase::ListPipelines))?
        .into_iter()
        .map(|extpipe| (extpipe.external_id.clone(), extpipe))
        .collect();
    debug!("Existing extraction pipelines: {:?}", existing.keys());

    let plan = planner::plan(&drafts, &existing, config.features.automatic_delete);
    log_plan(&plan);

    let desired = desired_tables(drafts.values().flat_map(|draft| draft.raw_tables.iter()));
    let raw_tables = plan_raw_tables(repo, &desired).await?;
    if !raw_tables.is_empty() {
        info!("RAW tables to create: {}", raw_tables.table_count());
    }

    Ok(Deployment {
        drafts,
        existing,
        plan,
        raw_tables,
    })
}

/// Run a full deployment: prepare, then apply unless `dry_run` is set
pub async fn deploy(
    repo: &dyn CdfRepository,
    config: &ExtpipesConfig,
    dry_run: bool,
) -> Result<DeployOutcome, DeployError> {
    let deployment = prepare(repo, config).await?;
    let summary = executor::execute(repo, &deployment, dry_run).await?;

    Ok(DeployOutcome {
        deployment,
        summary,
        dry_run,
    })
}

/// Materialize the desired state of every pipeline
fn build_drafts(
    config: &ExtpipesConfig,
    identities: Vec<Identity>,
    data_sets: &BTreeMap<String, i64>,
) -> Result<BTreeMap<String, ExtpipeDraft>, DeployError> {
    let defaults = &config.features.default_contacts;
    let mut drafts = BTreeMap::new();
    let mut issues = Vec::new();
    let mut missing = Vec::new();

    for (index, (pipeline, identity)) in config.pipelines.iter().zip(identities).enumerate() {
        let label = pipeline_label(index, pipeline);

        let Some(&data_set_id) = data_sets.get(&pipeline.data_set_external_id) else {
            missing.push(pipeline.data_set_external_id.clone());
            continue;
        };

        let configuration = match &pipeline.configuration {
            Some(payload) => match payload.to_text() {
                Ok(text) => Some(text),
                Err(e) => {
                    issues.push(format!("{}: 'extpipe-config' cannot be serialized: {}", label, e));
                    continue;
                }
            },
            None => None,
        };

        let description = pipeline
            .description
            .clone()
            .map(|d| truncate_field(d, MAX_DESCRIPTION_CHARS, "description", &label));

        let draft = ExtpipeDraft {
            external_id: identity.external_id,
            name: identity.name,
            description,
            data_set_id,
            raw_tables: pipeline.raw_tables.clone(),
            schedule: pipeline.schedule.clone(),
            contacts: pipeline.effective_contacts(defaults),
            metadata: pipeline.metadata.clone(),
            source: pipeline.source.clone(),
            documentation: pipeline.documentation.clone(),
            created_by: pipeline.created_by.clone(),
            configuration,
        };
        drafts.insert(draft.external_id.clone(), draft);
    }

    if !missing.is_empty() {
        missing.sort();
        missing.dedup();
        return Err(DeployError::DependencyMissing {
            kind: "dataset",
            missing,
        });
    }
    ConfigError::check(issues)?;

    Ok(drafts)
}

fn log_plan(plan: &ReconcilePlan) {
    if !plan.create.is_empty() {
        info!("Extraction pipelines to create: {:?}", plan.create);
    }
    if !plan.update.is_empty() {
        info!("Extraction pipelines to update: {:?}", plan.update);
    }
    if !plan.delete.is_empty() {
        info!("Extraction pipelines to delete: {:?}", plan.delete);
    }
    if !plan.would_delete.is_empty() {
        info!(
            "Automatic delete is disabled, keeping extraction pipelines not in the configuration: {:?}",
            plan.would_delete
        );
    }
}
