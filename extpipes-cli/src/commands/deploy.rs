//! Deploy command handler
//!
//! Loads the configuration file, connects to the project and reconciles the
//! declared extraction pipelines against it.

use std::path::PathBuf;

use clap::Args;
use extpipes_client::CdfClient;
use extpipes_core::domain::config::ExtpipesConfig;
use tracing::info;

use crate::config::{self, Config};
use crate::error::{DeployError, Phase};
use crate::loader;
use crate::report;
use crate::repository::HttpCdfRepository;
use crate::service::reconcile;

/// Arguments of the `deploy` command
#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Override `automatic-delete` from the configuration file
    #[arg(long, value_name = "yes|no", value_parser = parse_yes_no)]
    pub automatic_delete: Option<bool>,

    /// Path to the configuration file
    #[arg(default_value = "./config-extpipes.yml")]
    pub config_file: PathBuf,
}

/// Parse a yes/no style flag value
fn parse_yes_no(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => Err(format!("expected yes or no, found `{}`", other)),
    }
}

/// Command-line values win over the configuration file
fn apply_overrides(extpipes: &mut ExtpipesConfig, args: &DeployArgs) {
    if let Some(automatic_delete) = args.automatic_delete {
        extpipes.features.automatic_delete = automatic_delete;
    }
}

/// Run a deployment
pub async fn handle_deploy(args: DeployArgs, config: &Config) -> Result<(), DeployError> {
    info!("Loading configuration from {}", args.config_file.display());
    let document = loader::load_document(&args.config_file)?;

    let mut extpipes = document.extpipes;
    apply_overrides(&mut extpipes, &args);
    extpipes.validate()?;
    info!(
        pipelines = extpipes.pipelines.len(),
        automatic_delete = extpipes.features.automatic_delete,
        "Configuration is valid"
    );

    let connection = config::resolve_connection(document.cognite.as_ref(), &config.connection)?;
    info!(
        "Connecting to project '{}' on {}",
        connection.project, connection.host
    );
    let client = CdfClient::connect(
        connection.host.as_str(),
        connection.project.as_str(),
        &connection.credentials,
    )
    .await
    .map_err(DeployError::remote(Phase::Authenticate))?;

    let repo = HttpCdfRepository::new(client);
    let outcome = reconcile::deploy(&repo, &extpipes, config.dry_run).await?;

    report::print_outcome(&outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("yes"), Ok(true));
        assert_eq!(parse_yes_no("No"), Ok(false));
        assert_eq!(parse_yes_no("true"), Ok(true));
        assert!(parse_yes_no("maybe").is_err());
    }

    fn args(automatic_delete: Option<bool>) -> DeployArgs {
        DeployArgs {
            automatic_delete,
            config_file: PathBuf::from("config-extpipes.yml"),
        }
    }

    fn extpipes(automatic_delete: bool) -> ExtpipesConfig {
        let mut config = ExtpipesConfig::default();
        config.features.automatic_delete = automatic_delete;
        config
    }

    #[test]
    fn test_automatic_delete_flag_wins_over_file() {
        let mut config = extpipes(true);
        apply_overrides(&mut config, &args(Some(false)));
        assert!(!config.features.automatic_delete);

        let mut config = extpipes(false);
        apply_overrides(&mut config, &args(Some(true)));
        assert!(config.features.automatic_delete);
    }

    #[test]
    fn test_file_value_kept_without_flag() {
        let mut config = extpipes(true);
        apply_overrides(&mut config, &args(None));
        assert!(config.features.automatic_delete);

        let mut config = extpipes(false);
        apply_overrides(&mut config, &args(None));
        assert!(!config.features.automatic_delete);
    }
}
