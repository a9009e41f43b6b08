//! CSV report with one row per asset and the `TOTAIS` block beside it.

use crate::core::analytics::{AssetValue, PortfolioSummary};
use crate::core::asset::Figure;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const COLUMNS: [&str; 13] = [
    "xTicker",
    "xNcotas",
    "Cotacao",
    "TotGasto",
    "P/VP",
    "MediaDivR$/Cota",
    "TotDivid",
    "DY12meses",
    "TipodeFundo",
    "Segmento",
    "ValorPatrimonial",
    "NCotistas",
    "GBRindex",
];

const NOT_AVAILABLE: &str = "N/D";
/// Fills the indicator cells of an asset whose page was never rendered.
const RENDER_FAILED: &str = "ERRO";

fn figure_text(figure: &Figure, decimals: usize) -> String {
    match figure {
        Figure::Value(v) => format!("{v:.decimals$}"),
        Figure::Absent => NOT_AVAILABLE.to_string(),
        Figure::Malformed(raw) => format!("invalid({raw})"),
    }
}

fn number_text(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.decimals$}"))
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn report_row(value: &AssetValue) -> Vec<String> {
    let record = &value.record;
    if record.render_error.is_some() {
        let mut row = vec![record.ticker.clone(), record.share_count.to_string()];
        row.resize(COLUMNS.len(), RENDER_FAILED.to_string());
        return row;
    }
    vec![
        record.ticker.clone(),
        record.share_count.to_string(),
        figure_text(&record.quote, 2),
        number_text(value.total_spent, 2),
        figure_text(&record.price_to_book, 2),
        number_text(record.avg_dividend.value(), 4),
        number_text(value.total_dividends, 2),
        text(&record.dividend_yield_12m),
        text(&record.fund_type),
        text(&record.segment),
        text(&record.book_value),
        text(&record.shareholder_count),
        number_text(value.yield_index, 4),
    ]
}

/// Lines of the `TOTAIS` block, from its label down.
pub fn summary_lines(summary: &PortfolioSummary) -> [String; 3] {
    [
        "TOTAIS".to_string(),
        format!("Total gasto em R$: {:.2}", summary.total_spent),
        format!("Acréscimo de dividendos em R$: {:.2}", summary.total_dividends),
    ]
}

/// Writes the asset rows, then places the summary block after an empty spacer
/// column so it stays outside the row range.
pub fn write_report<W: Write>(
    writer: W,
    values: &[AssetValue],
    summary: &PortfolioSummary,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let summary = summary_lines(summary);
    let block_at = |line: usize| summary.get(line).cloned().unwrap_or_default();

    let mut header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend([String::new(), block_at(0)]);
    csv.write_record(&header)?;

    let rows = values.len().max(summary.len() - 1);
    for index in 0..rows {
        let mut row = match values.get(index) {
            Some(value) => report_row(value),
            None => vec![String::new(); COLUMNS.len()],
        };
        row.extend([String::new(), block_at(index + 1)]);
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}

pub fn write_report_file<P: AsRef<Path>>(
    path: P,
    values: &[AssetValue],
    summary: &PortfolioSummary,
) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report: {}", path.display()))?;
    write_report(file, values, summary)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
