//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod deploy;

pub use deploy::DeployArgs;

use clap::Subcommand;

use crate::config::Config;
use crate::error::DeployError;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Deploy extraction pipelines described in a configuration file
    Deploy(DeployArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<(), DeployError> {
    match command {
        Commands::Deploy(args) => deploy::handle_deploy(args, config).await,
    }
}
