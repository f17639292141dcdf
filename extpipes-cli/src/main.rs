//! extpipes CLI
//!
//! Deploys extraction pipelines declared in a YAML file to a data-platform
//! project: missing pipelines are created, existing ones updated, and, with
//! automatic delete enabled, pipelines no longer declared are removed.

mod commands;
mod config;
mod error;
mod loader;
mod logging;
mod report;
mod repository;
mod service;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::{Config, ConnectionOverrides};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "extpipes-cli", version)]
#[command(about = "Deploy extraction pipelines from a YAML configuration", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Show the planned changes without applying them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Environment file to load (defaults to ./.env when present)
    #[arg(long, global = true, value_name = "PATH")]
    dotenv_path: Option<PathBuf>,

    /// API cluster URL
    #[arg(long, global = true, env = "CDF_HOST")]
    host: Option<String>,

    /// Project to deploy to
    #[arg(long, global = true, env = "CDF_PROJECT")]
    project: Option<String>,

    /// Identity provider client id
    #[arg(long, global = true, env = "IDP_CLIENT_ID")]
    client_id: Option<String>,

    /// Identity provider client secret
    #[arg(long, global = true, env = "IDP_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Identity provider token URL
    #[arg(long, global = true, env = "IDP_TOKEN_URL")]
    token_url: Option<String>,

    /// Requested scopes (comma-separated)
    #[arg(long, global = true, env = "IDP_SCOPES", value_delimiter = ',')]
    scopes: Option<Vec<String>>,

    /// Token audience
    #[arg(long, global = true, env = "IDP_AUDIENCE")]
    audience: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut cli = Cli::parse();

    let dotenv = loader::load_dotenv(cli.dotenv_path.as_deref());
    if matches!(dotenv, Ok(Some(_))) {
        // env-backed flags must see the values loaded from the file
        cli = Cli::parse();
    }

    logging::init(cli.debug);
    info!("extpipes-cli {}", env!("CARGO_PKG_VERSION"));

    match dotenv {
        Ok(Some(path)) => debug!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => return fail(&error::DeployError::from(e)),
    }

    let config = Config {
        dry_run: cli.dry_run,
        connection: ConnectionOverrides {
            host: cli.host,
            project: cli.project,
            client_id: cli.client_id,
            client_secret: cli.client_secret,
            token_url: cli.token_url,
            scopes: cli.scopes,
            audience: cli.audience,
        },
    };

    match handle_command(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(err: &error::DeployError) -> ExitCode {
    eprintln!("{} {}", "✗".red().bold(), err);
    ExitCode::from(err.exit_code())
}
