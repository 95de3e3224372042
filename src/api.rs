//! Command-line surface
//!
//! `cli` declares the arguments; `commands` holds one module per subcommand.

pub mod cli;
pub mod commands;

use tracing::debug;

use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;
use cli::{Cli, Commands};

/// Load settings, then route to the subcommand handler.
pub async fn dispatch(cli: Cli) -> AppResult<()> {
    let settings = AppSettings::load(cli.config.as_deref()).await;
    debug!(model = %settings.assistant.model, "settings loaded");

    match cli.command {
        Commands::Convert { value, from, to, decimals } => {
            let decimals = decimals.unwrap_or(settings.preferences.result_decimals);
            commands::convert::run(value, &from, &to, decimals, cli.json)
        }
        Commands::Units { category, all } => {
            commands::units::run(category.as_deref(), all, cli.json)
        }
        Commands::Ask { query, model, timeout_secs } => {
            commands::assistant::run(&settings, &query.join(" "), model, timeout_secs, cli.json).await
        }
        Commands::Session => commands::session::run(&settings).await,
    }
}
