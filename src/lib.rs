pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use cli::run::RunOptions;
use tracing::{debug, info};

pub enum AppCommand {
    Run(RunOptions),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("FII tracker starting...");

    let config = match config_path {
        Some(path) => crate::core::config::AppConfig::load_from_path(path)?,
        None => crate::core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let renderer = providers::build_renderer(&config.renderer)?;

    match command {
        AppCommand::Run(options) => {
            cli::run::run(&config, &*renderer, options).await?;
        }
    }
    Ok(())
}
