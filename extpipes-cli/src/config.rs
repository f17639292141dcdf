//! Configuration module
//!
//! The deployment document (connection section plus declared pipelines) and
//! the run settings collected from the command line.

use extpipes_client::Credentials;
use extpipes_core::domain::config::ExtpipesConfig;
use serde::Deserialize;

use crate::error::DeployError;

/// Run settings taken from flags and environment
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Report the plan without changing the project
    pub dry_run: bool,
    /// Connection values that win over the document's `cognite` section
    pub connection: ConnectionOverrides,
}

/// Connection values supplied on the command line or through env vars
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub host: Option<String>,
    pub project: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: Option<String>,
    pub scopes: Option<Vec<String>>,
    pub audience: Option<String>,
}

/// A deployment document as read from disk
///
/// Unknown top-level sections are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployDocument {
    #[serde(default)]
    pub cognite: Option<CogniteConfig>,
    pub extpipes: ExtpipesConfig,
}

/// `cognite` section: where to deploy
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CogniteConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default, alias = "idp_authentication")]
    pub idp_authentication: Option<IdpAuthentication>,
}

/// `idp-authentication` section: client-credentials login
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IdpAuthentication {
    #[serde(default, alias = "client_id")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default, alias = "token_url")]
    pub token_url: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub audience: Option<String>,
}

/// Fully resolved connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub host: String,
    pub project: String,
    pub credentials: Credentials,
}

/// Merge overrides over the document's `cognite` section
///
/// Without any scope, `{host}/.default` is requested.
///
/// # Errors
/// `Configuration` listing every field that is still missing.
pub fn resolve_connection(
    document: Option<&CogniteConfig>,
    overrides: &ConnectionOverrides,
) -> Result<Connection, DeployError> {
    let file = document.cloned().unwrap_or_default();
    let auth = file.idp_authentication.unwrap_or_default();
    let mut missing = Vec::new();

    let mut required = |flag: Option<&String>, value: Option<String>, name: &'static str| {
        let resolved = flag.cloned().or(value).filter(|v| !v.trim().is_empty());
        if resolved.is_none() {
            missing.push(name);
        }
        resolved.unwrap_or_default()
    };

    let host = required(overrides.host.as_ref(), file.host, "host (--host / CDF_HOST)");
    let project = required(
        overrides.project.as_ref(),
        file.project,
        "project (--project / CDF_PROJECT)",
    );
    let client_id = required(
        overrides.client_id.as_ref(),
        auth.client_id,
        "client id (--client-id / IDP_CLIENT_ID)",
    );
    let client_secret = required(
        overrides.client_secret.as_ref(),
        auth.secret,
        "client secret (--client-secret / IDP_CLIENT_SECRET)",
    );
    let token_url = required(
        overrides.token_url.as_ref(),
        auth.token_url,
        "token url (--token-url / IDP_TOKEN_URL)",
    );

    if !missing.is_empty() {
        return Err(DeployError::configuration(format!(
            "missing connection setting(s): {}",
            missing.join(", ")
        )));
    }

    let host = host.trim_end_matches('/').to_string();
    let mut scopes = overrides.scopes.clone().unwrap_or(auth.scopes);
    scopes.retain(|scope| !scope.trim().is_empty());
    if scopes.is_empty() {
        scopes.push(format!("{}/.default", host));
    }

    Ok(Connection {
        credentials: Credentials {
            client_id,
            client_secret,
            token_url,
            scopes,
            audience: overrides.audience.clone().or(auth.audience),
        },
        host,
        project,
    })
}
