//! CLI mode

use crate::cli::Commands;
use crate::interfaces::cli::{self, CliError};
use crate::runtime::lifetime;

/// Run one CLI command
///
/// `config generate` needs no storage; everything else opens the
/// configured profile store first.
pub async fn run_cli(command: Commands, secret: Option<String>) -> Result<(), CliError> {
    if let Commands::Config { action } = command {
        return cli::run_config_command(action).await;
    }

    let store = lifetime::startup::build_store().await?;
    cli::execute(&store, command, secret).await
}
