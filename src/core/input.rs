//! Reading the list of funds and share counts.

use crate::core::asset::AssetInput;
use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads a CSV with `Ticker` and `Ncotas` columns. Row order and duplicate
/// tickers are preserved.
pub fn read_ticker_list<P: AsRef<Path>>(path: P) -> Result<Vec<AssetInput>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open ticker list: {}", path.display()))?;
    parse_ticker_list(file).with_context(|| format!("Invalid ticker list: {}", path.display()))
}

pub fn parse_ticker_list<R: Read>(reader: R) -> Result<Vec<AssetInput>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut assets = Vec::new();
    for (index, row) in reader.deserialize::<AssetInput>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let asset = row.with_context(|| format!("Failed to read row at line {line}"))?;
        if asset.ticker.is_empty() {
            bail!("Empty ticker at line {line}");
        }
        // The ticker names a URL segment and a file in the work directory.
        if !asset.ticker.chars().all(|c| c.is_ascii_alphanumeric()) {
            bail!("Invalid ticker {:?} at line {line}", asset.ticker);
        }
        if !asset.share_count.is_finite() || asset.share_count < 0.0 {
            bail!(
                "Invalid share count {} for {} at line {line}",
                asset.share_count,
                asset.ticker
            );
        }
        assets.push(asset);
    }
    debug!("Read {} assets", assets.len());
    Ok(assets)
}
