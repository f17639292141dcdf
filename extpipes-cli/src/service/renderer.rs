//! Identifier rendering
//!
//! Turns every declared pipeline into the external id and display name it will
//! carry remotely, either from explicit fields or from the naming pattern.

use std::collections::BTreeMap;

use extpipes_core::domain::config::{ExtpipesConfig, PipelineSpec, pipeline_label};
use extpipes_core::domain::naming::NamingPattern;
use extpipes_core::error::ConfigError;
use tracing::warn;

/// API limit for external ids, in characters
pub const MAX_EXTERNAL_ID_CHARS: usize = 255;
/// API limit for names, in characters
pub const MAX_NAME_CHARS: usize = 255;
/// API limit for descriptions, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Identifiers of one pipeline after rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub external_id: String,
    pub name: String,
}

/// Render identifiers for every pipeline, in declaration order
///
/// Fails when a pipeline cannot be named, or when two pipelines end up with the
/// same external id. All offending pipelines are reported together.
pub fn render_identities(config: &ExtpipesConfig) -> Result<Vec<Identity>, ConfigError> {
    let pattern = config
        .features
        .naming_pattern()
        .map(NamingPattern::parse)
        .transpose()
        .map_err(|e| ConfigError::new(vec![e.to_string()]))?;

    let mut identities = Vec::with_capacity(config.pipelines.len());
    let mut issues = Vec::new();

    for (index, pipeline) in config.pipelines.iter().enumerate() {
        let label = pipeline_label(index, pipeline);
        match render_one(pattern.as_ref(), pipeline) {
            Ok((external_id, name)) => {
                let external_id =
                    truncate_field(external_id, MAX_EXTERNAL_ID_CHARS, "external-id", &label);
                let name = truncate_field(name, MAX_NAME_CHARS, "name", &label);
                identities.push(Identity { external_id, name });
            }
            Err(reason) => issues.push(format!("{}: {}", label, reason)),
        }
    }
    ConfigError::check(issues)?;

    ConfigError::check(uniqueness_issues(&identities))?;
    Ok(identities)
}

/// Explicit fields win; otherwise the pattern names the pipeline
fn render_one(
    pattern: Option<&NamingPattern>,
    pipeline: &PipelineSpec,
) -> Result<(String, String), String> {
    let rendered = match pattern {
        Some(pattern) => Some(pattern.render(&pipeline.metadata).map_err(|e| e.to_string())?),
        None => None,
    };

    let external_id = match (pipeline.explicit_external_id(), &rendered) {
        (Some(explicit), _) => explicit.to_string(),
        (None, Some(rendered)) => rendered.clone(),
        (None, None) => {
            return Err(
                "'external-id' is required when no 'extpipe-pattern' is configured".to_string(),
            );
        }
    };

    let name = pipeline
        .explicit_name()
        .map(str::to_string)
        .or(rendered)
        .unwrap_or_else(|| external_id.clone());

    Ok((external_id, name))
}

fn uniqueness_issues(identities: &[Identity]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut owners: BTreeMap<&str, Vec<usize>> = BTreeMap::new();

    for (index, identity) in identities.iter().enumerate() {
        if identity.external_id.trim().is_empty() {
            issues.push(format!("pipeline #{}: external id is empty", index + 1));
        } else {
            owners
                .entry(identity.external_id.as_str())
                .or_default()
                .push(index + 1);
        }
    }

    for (external_id, positions) in owners {
        if positions.len() > 1 {
            let positions: Vec<String> = positions.iter().map(|p| format!("#{}", p)).collect();
            issues.push(format!(
                "external id '{}' is used by more than one pipeline ({})",
                external_id,
                positions.join(", ")
            ));
        }
    }

    issues
}

/// Cut `value` to `limit` characters, warning when anything was removed
pub fn truncate_field(value: String, limit: usize, field: &str, label: &str) -> String {
    match value.char_indices().nth(limit) {
        Some((cut, _)) => {
            warn!(
                "{}: '{}' is longer than {} characters and was truncated",
                label, field, limit
            );
            value[..cut].to_string()
        }
        None => value,
    }
}
