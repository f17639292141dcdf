//! Deployment error taxonomy
//!
//! Every failure of a run falls into one of three categories, each with its
//! own process exit code so CI jobs can tell them apart.

use std::fmt;

use extpipes_client::ClientError;
use extpipes_core::error::ConfigError;
use thiserror::Error;

/// Stage of a run that issued a remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Authenticate,
    ListPipelines,
    DatasetLookup,
    RawListing,
    CreateRawTables,
    Delete,
    Create,
    Update,
    ConfigRevisions,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Authenticate => "authentication",
            Phase::ListPipelines => "listing extraction pipelines",
            Phase::DatasetLookup => "dataset lookup",
            Phase::RawListing => "listing RAW databases and tables",
            Phase::CreateRawTables => "RAW table creation",
            Phase::Delete => "extraction pipeline deletion",
            Phase::Create => "extraction pipeline creation",
            Phase::Update => "extraction pipeline update",
            Phase::ConfigRevisions => "config revision upload",
        };
        f.write_str(label)
    }
}

/// Errors that abort a deployment run
#[derive(Debug, Error)]
pub enum DeployError {
    /// Malformed or inconsistent configuration, detected before any remote call
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Referenced remote resources that do not exist
    #[error("Missing {kind}(s): {}", .missing.join(", "))]
    DependencyMissing {
        kind: &'static str,
        missing: Vec<String>,
    },

    /// A remote call failed; phases completed before it stay applied
    #[error("Remote API call failed during {phase}: {source}")]
    RemoteApi {
        phase: Phase,
        #[source]
        source: ClientError,
    },
}

impl DeployError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Wrap a client error raised during `phase`
    pub fn remote(phase: Phase) -> impl FnOnce(ClientError) -> Self {
        move |source| Self::RemoteApi { phase, source }
    }

    /// Process exit code for this category
    pub fn exit_code(&self) -> u8 {
        match self {
            DeployError::Configuration(_) => 3,
            DeployError::DependencyMissing { .. } => 4,
            DeployError::RemoteApi { .. } => 5,
        }
    }
}

impl From<ConfigError> for DeployError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<anyhow::Error> for DeployError {
    fn from(err: anyhow::Error) -> Self {
        Self::Configuration(format!("{:#}", err))
    }
}
