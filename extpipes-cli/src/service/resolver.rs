//! Dataset resolution
//!
//! Pipelines reference their dataset by external id while the API wants the
//! numeric handle. The resolver looks handles up in one batch and remembers
//! them for the rest of the run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use extpipes_client::ClientError;
use tracing::debug;

use crate::error::{DeployError, Phase};
use crate::repository::CdfRepository;

/// Run-scoped cache of dataset handles
pub struct DataSetResolver<'a> {
    repo: &'a dyn CdfRepository,
    cache: HashMap<String, i64>,
}

impl<'a> DataSetResolver<'a> {
    pub fn new(repo: &'a dyn CdfRepository) -> Self {
        Self {
            repo,
            cache: HashMap::new(),
        }
    }

    /// Resolve every referenced dataset, failing if any of them is missing
    ///
    /// Ids are deduplicated and only ids not seen earlier in the run are
    /// requested. The error lists every missing id, not just the first.
    pub async fn resolve_all<'i>(
        &mut self,
        external_ids: impl IntoIterator<Item = &'i str>,
    ) -> Result<BTreeMap<String, i64>, DeployError> {
        let requested: BTreeSet<&str> = external_ids.into_iter().collect();
        let unknown: Vec<String> = requested
            .iter()
            .filter(|id| !self.cache.contains_key(**id))
            .map(|id| id.to_string())
            .collect();

        if !unknown.is_empty() {
            debug!(count = unknown.len(), "Looking up datasets");
            let datasets = self
                .repo
                .retrieve_datasets(&unknown)
                .await
                .map_err(|e| match e {
                    ClientError::NotFound(missing) => DeployError::DependencyMissing {
                        kind: "dataset",
                        missing,
                    },
                    other => DeployError::RemoteApi {
                        phase: Phase::DatasetLookup,
                        source: other,
                    },
                })?;

            for dataset in datasets {
                if let Some(external_id) = dataset.external_id {
                    self.cache.insert(external_id, dataset.id);
                }
            }
        }

        let mut resolved = BTreeMap::new();
        let mut missing = Vec::new();
        for id in requested {
            match self.cache.get(id) {
                Some(handle) => {
                    resolved.insert(id.to_string(), *handle);
                }
                None => missing.push(id.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(DeployError::DependencyMissing {
                kind: "dataset",
                missing,
            });
        }

        Ok(resolved)
    }
}
