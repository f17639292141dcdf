//! Configuration file loading
//!
//! Reads the deployment document, substitutes `${VAR}` references from the
//! environment and parses the YAML into typed configuration.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use crate::config::DeployDocument;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Default `.env` file picked up from the working directory
const DEFAULT_DOTENV: &str = ".env";

/// Substitute `${VAR_NAME}` patterns with environment variable values.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set.
pub fn substitute_env_vars(input: &str) -> Result<String> {
    substitute_with(input, |name| std::env::var(name).ok())
}

/// Substitute `${VAR_NAME}` patterns using `lookup`
pub fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let mut missing: Vec<String> = Vec::new();

    let result = ENV_VAR_RE
        .replace_all(input, |caps: &Captures| match lookup(&caps[1]) {
            Some(value) => value,
            None => {
                if !missing.iter().any(|name| name == &caps[1]) {
                    missing.push(caps[1].to_string());
                }
                String::new()
            }
        })
        .into_owned();

    if !missing.is_empty() {
        anyhow::bail!("Missing environment variable(s): {}", missing.join(", "));
    }

    Ok(result)
}

/// Parse a deployment document (after env var substitution).
pub fn parse_document_str(yaml: &str) -> Result<DeployDocument> {
    let substituted = substitute_env_vars(yaml)?;
    serde_yaml::from_str(&substituted).context("Failed to parse configuration YAML")
}

/// Load a deployment document from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read, references unset environment
/// variables, or does not match the configuration schema.
pub fn load_document(path: &Path) -> Result<DeployDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    parse_document_str(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// Load variables from a `.env` file, overriding the current environment
///
/// An explicit `path` must exist. Without one, `./.env` is loaded when present.
/// Returns the file that was loaded, if any.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_DOTENV);
            if !default.is_file() {
                return Ok(None);
            }
            default
        }
    };

    dotenvy::from_path_override(&path)
        .with_context(|| format!("Failed to load environment file: {}", path.display()))?;
    Ok(Some(path))
}
