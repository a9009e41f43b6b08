//! Extraction of fund indicators from a fund's page.
//!
//! Extraction never fails: anything the page does not show is `None`.

use crate::core::document::DocumentNode;
use crate::core::number::{format_currency4, parse_locale_number};
use std::collections::HashMap;
use std::fmt::Display;
use tracing::debug;

const LIVE_PRICE: &str = "strong.livePrice";
const CARD: &str = "div._card";
const DY_CARD: &str = "div._card.dy";
const CARD_VALUE: &str = "div._card-body span";
const PRICE_TO_BOOK_TITLE: &str = "span[title='P/VP']";
const DIVIDEND_YIELD_TITLE: &str = "span[title='Dividend Yield']";
const DY_12M_LABEL: &str = "DY (12M)";
const DIVIDEND_ROWS: &str = "#table-dividends-history tbody tr";
const DESC_BLOCK: &str = "div.desc";
const DESC_NAME: &str = "span.name";
const DESC_VALUE: &str = "div.value span";

/// Dividend payments averaged for the per-share figure.
pub const DIVIDEND_WINDOW: usize = 6;
/// Column of the dividend history table holding the paid amount.
const DIVIDEND_VALUE_COLUMN: usize = 3;

const FUND_TYPE_KEYS: &[&str] = &["TIPO DE FUNDO"];
const SEGMENT_KEYS: &[&str] = &["SEGMENTO"];
const BOOK_VALUE_KEYS: &[&str] = &["VALOR PATRIMONIAL"];
const SHAREHOLDER_KEYS: &[&str] = &["NUMERO DE COTISTAS", "NÚMERO DE COTISTAS"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Quote,
    PriceToBook,
    DividendYield12M,
    AvgDividendPerShare,
    FundType,
    Segment,
    BookValue,
    ShareholderCount,
}

impl Indicator {
    pub const ALL: [Indicator; 8] = [
        Indicator::Quote,
        Indicator::DividendYield12M,
        Indicator::PriceToBook,
        Indicator::AvgDividendPerShare,
        Indicator::FundType,
        Indicator::Segment,
        Indicator::BookValue,
        Indicator::ShareholderCount,
    ];
}

impl Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Indicator::Quote => "Cotação",
                Indicator::PriceToBook => "P/VP",
                Indicator::DividendYield12M => "DY (12M)",
                Indicator::AvgDividendPerShare => "Média últimos 6 dividendos",
                Indicator::FundType => "Tipo de Fundo",
                Indicator::Segment => "Segmento",
                Indicator::BookValue => "Valor Patrimonial",
                Indicator::ShareholderCount => "Cotistas",
            }
        )
    }
}

/// Average of the most recent dividends per share.
///
/// Only a full window is averaged; fewer points yield `NotAvailable`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DividendAverage {
    /// Mean rounded once to four decimals, as displayed.
    Mean(f64),
    #[default]
    NotAvailable,
}

impl DividendAverage {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.len() != DIVIDEND_WINDOW {
            return DividendAverage::NotAvailable;
        }
        let mean = samples.iter().sum::<f64>() / DIVIDEND_WINDOW as f64;
        // The displayed four-place text is the value carried downstream.
        match format!("{mean:.4}").parse::<f64>() {
            Ok(rounded) => DividendAverage::Mean(rounded),
            Err(_) => DividendAverage::NotAvailable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            DividendAverage::Mean(v) => Some(*v),
            DividendAverage::NotAvailable => None,
        }
    }
}

impl Display for DividendAverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DividendAverage::Mean(v) => write!(f, "{}", format_currency4(*v)),
            DividendAverage::NotAvailable => write!(f, "N/D"),
        }
    }
}

/// Raw indicator texts for one fund.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    pub quote: Option<String>,
    pub price_to_book: Option<String>,
    pub dividend_yield_12m: Option<String>,
    pub avg_dividend: DividendAverage,
    pub fund_type: Option<String>,
    pub segment: Option<String>,
    pub book_value: Option<String>,
    pub shareholder_count: Option<String>,
}

impl IndicatorSet {
    /// Display text of an indicator, `None` when the page did not show it.
    pub fn get(&self, indicator: Indicator) -> Option<String> {
        match indicator {
            Indicator::Quote => self.quote.clone(),
            Indicator::PriceToBook => self.price_to_book.clone(),
            Indicator::DividendYield12M => self.dividend_yield_12m.clone(),
            Indicator::AvgDividendPerShare => Some(self.avg_dividend.to_string()),
            Indicator::FundType => self.fund_type.clone(),
            Indicator::Segment => self.segment.clone(),
            Indicator::BookValue => self.book_value.clone(),
            Indicator::ShareholderCount => self.shareholder_count.clone(),
        }
    }
}

/// Extracts every indicator from the document rooted at `root`.
pub fn extract<N: DocumentNode>(root: &N) -> IndicatorSet {
    let descriptions = description_entries(root);
    let lookup = |keys: &[&str]| keys.iter().find_map(|k| descriptions.get(*k).cloned());

    IndicatorSet {
        quote: root.find_first(LIVE_PRICE).map(|n| n.clean_text()),
        price_to_book: price_to_book(root),
        dividend_yield_12m: dividend_yield_12m(root),
        avg_dividend: DividendAverage::from_samples(&recent_dividends(root)),
        fund_type: lookup(FUND_TYPE_KEYS),
        segment: lookup(SEGMENT_KEYS),
        book_value: lookup(BOOK_VALUE_KEYS),
        shareholder_count: lookup(SHAREHOLDER_KEYS),
    }
}

/// Name/value pairs from the description blocks, keyed by upper-cased name.
/// Blocks lacking either part are skipped; a repeated name keeps the last value.
pub fn description_entries<N: DocumentNode>(root: &N) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    for block in root.find_all(DESC_BLOCK) {
        let (Some(name), Some(value)) =
            (block.find_first(DESC_NAME), block.find_first(DESC_VALUE))
        else {
            debug!("Skipping description block without name or value");
            continue;
        };
        entries.insert(name.clean_text().to_uppercase(), value.clean_text());
    }
    entries
}

fn price_to_book<N: DocumentNode>(root: &N) -> Option<String> {
    root.find_all(CARD).iter().find_map(|card| {
        card.find_first(PRICE_TO_BOOK_TITLE)?;
        card.find_first(CARD_VALUE).map(|v| v.clean_text())
    })
}

fn dividend_yield_12m<N: DocumentNode>(root: &N) -> Option<String> {
    let card = root.find_all(DY_CARD).into_iter().find(|card| {
        card.find_first(DIVIDEND_YIELD_TITLE)
            .is_some_and(|title| title.text_content().contains(DY_12M_LABEL))
    })?;
    card.find_first(CARD_VALUE).map(|v| v.clean_text())
}

/// Parsed amounts of the most recent dividend rows. Rows that are too short
/// or do not parse are dropped, so the result may hold fewer than the window.
fn recent_dividends<N: DocumentNode>(root: &N) -> Vec<f64> {
    root.find_all(DIVIDEND_ROWS)
        .iter()
        .take(DIVIDEND_WINDOW)
        .filter_map(|row| {
            let cells = row.find_all("td");
            let raw = cells.get(DIVIDEND_VALUE_COLUMN)?.clean_text();
            match parse_locale_number(&raw) {
                Ok(amount) => Some(amount),
                Err(e) => {
                    debug!(error = %e, "Dropping dividend row");
                    None
                }
            }
        })
        .collect()
}
