use super::{report, ui};
use crate::core::analytics::{self, PortfolioSummary};
use crate::core::asset::{AssetProcessor, AssetRecord};
use crate::core::config::{AppConfig, RenderErrorPolicy};
use crate::core::error::AssetError;
use crate::core::input;
use crate::core::render::{PageRenderer, ResourceBlockPolicy, ResourceType};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Command-line overrides of the configuration.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub blocked_resources: Option<Vec<ResourceType>>,
}

/// Processes every listed fund in order, one at a time, then writes the report.
pub async fn run(
    config: &AppConfig,
    renderer: &dyn PageRenderer,
    options: RunOptions,
) -> Result<PortfolioSummary> {
    let input_path = options
        .input
        .or_else(|| config.input.clone())
        .context("No ticker list given; set `input` in the config or pass --input")?;
    let output_path = options.output.unwrap_or_else(|| config.output.clone());
    let block_policy = options
        .blocked_resources
        .map(ResourceBlockPolicy::new)
        .unwrap_or_else(|| config.renderer.block_policy());

    let assets = input::read_ticker_list(&input_path)?;
    info!("Processing {} funds from {}", assets.len(), input_path.display());

    let work_dir = config.work_dir();
    let processor = AssetProcessor::new(renderer, &config.source.base_url, &work_dir, block_policy);

    let pb = ui::new_progress_bar(assets.len() as u64, true);
    let mut records = Vec::with_capacity(assets.len());
    for (index, asset) in assets.iter().enumerate() {
        let ticker = asset.display_ticker();
        pb.set_message(format!("{ticker} ({} de {})", index + 1, assets.len()));

        let record = match processor.process(asset).await {
            Ok(record) => record,
            Err(AssetError::Render(e)) if config.on_render_error == RenderErrorPolicy::Skip => {
                warn!(error = %e, "Skipping {} after render failure", ticker);
                AssetRecord::render_failed(asset, &e)
            }
            Err(e) => {
                pb.finish_and_clear();
                return Err(e).with_context(|| format!("Failed to process {ticker}"));
            }
        };

        pb.suspend(|| println!("{}\n", ui::asset_block(&record)));
        records.push(record);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let (values, summary) = analytics::aggregate(records);
    report::write_report_file(&output_path, &values, &summary)?;

    println!("{}", ui::portfolio_table(&values, &summary));
    println!(
        "\n{}",
        ui::style_text(
            &format!("Report saved to {}", output_path.display()),
            ui::StyleType::Subtle
        )
    );

    Ok(summary)
}
