use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fiis::cli::run::RunOptions;
use fiis::core::log::init_logging;
use fiis::core::render::ResourceType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch indicators for every listed fund and write the portfolio report
    Run {
        /// CSV with `Ticker` and `Ncotas` columns
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Report file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Resource types the renderer should not load, e.g. `image,font`
        #[arg(long, value_delimiter = ',')]
        block: Option<Vec<ResourceType>>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fiis::cli::setup::setup(),
        Some(Commands::Run {
            input,
            output,
            block,
        }) => {
            let options = RunOptions {
                input,
                output,
                blocked_resources: block,
            };
            fiis::run_command(fiis::AppCommand::Run(options), cli.config_path.as_deref()).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
