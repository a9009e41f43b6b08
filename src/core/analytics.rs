//! Provides functions for computing spend, dividend and yield figures for a
//! portfolio of funds.
use crate::core::asset::{AssetRecord, Figure};
use crate::core::indicators::{DividendAverage, Indicator};
use crate::core::number::round_to;
use std::fmt::Display;
use tracing::debug;

/// Why a computed figure of an asset is missing or should be read with care.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordIssue {
    RenderFailed(String),
    Missing(Indicator),
    Malformed { indicator: Indicator, raw: String },
    /// Nothing was spent, so the yield index is undefined.
    ZeroSpend,
}

impl Display for RecordIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordIssue::RenderFailed(e) => write!(f, "page not rendered: {e}"),
            RecordIssue::Missing(indicator) => write!(f, "{indicator} not available"),
            RecordIssue::Malformed { indicator, raw } => {
                write!(f, "{indicator} is not a number: {raw:?}")
            }
            RecordIssue::ZeroSpend => write!(f, "total spent is zero, yield index undefined"),
        }
    }
}

/// An asset record with its computed totals.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetValue {
    pub record: AssetRecord,
    /// `share_count × quote`.
    pub total_spent: Option<f64>,
    /// `share_count × average dividend per share`.
    pub total_dividends: Option<f64>,
    /// `total_dividends / total_spent`, rounded to four places.
    pub yield_index: Option<f64>,
    pub issues: Vec<RecordIssue>,
}

impl AssetValue {
    pub fn is_flagged(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Portfolio-wide totals over the assets whose figures are known.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PortfolioSummary {
    pub total_spent: f64,
    pub total_dividends: f64,
    /// Assets left out of at least one of the sums.
    pub incomplete: usize,
}

/// Computes the totals and yield index of a single asset.
pub fn value_asset(record: AssetRecord) -> AssetValue {
    let mut issues = Vec::new();

    if let Some(error) = &record.render_error {
        issues.push(RecordIssue::RenderFailed(error.clone()));
    } else {
        for (indicator, figure) in [
            (Indicator::Quote, &record.quote),
            (Indicator::PriceToBook, &record.price_to_book),
        ] {
            match figure {
                Figure::Value(_) => {}
                Figure::Absent if indicator == Indicator::Quote => {
                    issues.push(RecordIssue::Missing(indicator))
                }
                Figure::Absent => {}
                Figure::Malformed(raw) => issues.push(RecordIssue::Malformed {
                    indicator,
                    raw: raw.clone(),
                }),
            }
        }
        if record.avg_dividend == DividendAverage::NotAvailable {
            issues.push(RecordIssue::Missing(Indicator::AvgDividendPerShare));
        }
    }

    let total_spent = record.quote.value().map(|quote| record.share_count * quote);
    let total_dividends = record
        .avg_dividend
        .value()
        .map(|dividend| record.share_count * dividend);

    let yield_index = match (total_spent, total_dividends) {
        (Some(spent), Some(dividends)) if spent != 0.0 => Some(round_to(dividends / spent, 4)),
        _ => None,
    };
    if total_spent == Some(0.0) {
        issues.push(RecordIssue::ZeroSpend);
    }

    if !issues.is_empty() {
        debug!(ticker = %record.ticker, ?issues, "Asset has incomplete figures");
    }

    AssetValue {
        record,
        total_spent,
        total_dividends,
        yield_index,
        issues,
    }
}

/// Values every record, keeping input order, and sums the known totals.
pub fn aggregate(records: Vec<AssetRecord>) -> (Vec<AssetValue>, PortfolioSummary) {
    let values: Vec<AssetValue> = records.into_iter().map(value_asset).collect();

    let mut summary = PortfolioSummary::default();
    for value in &values {
        summary.total_spent += value.total_spent.unwrap_or_default();
        summary.total_dividends += value.total_dividends.unwrap_or_default();
        if value.total_spent.is_none() || value.total_dividends.is_none() {
            summary.incomplete += 1;
        }
    }
    debug!(?summary, "Aggregated portfolio");

    (values, summary)
}
