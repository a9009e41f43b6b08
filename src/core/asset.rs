//! Per-asset processing: render the fund page, extract its indicators and
//! assemble the output record.

use crate::core::document::ParsedPage;
use crate::core::error::{AssetError, RenderError};
use crate::core::indicators::{self, DividendAverage, Indicator, IndicatorSet};
use crate::core::number::parse_locale_number;
use crate::core::render::{PageRenderer, RenderRequest, ResourceBlockPolicy};
use serde::Deserialize;
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// One row of the ticker list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetInput {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Ncotas")]
    pub share_count: f64,
}

impl AssetInput {
    pub fn new(ticker: &str, share_count: f64) -> Self {
        Self {
            ticker: ticker.to_string(),
            share_count,
        }
    }

    /// Ticker as displayed and used for artifact names.
    pub fn display_ticker(&self) -> String {
        self.ticker.trim().to_uppercase()
    }
}

/// A numeric indicator after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Value(f64),
    /// The page did not show the indicator.
    Absent,
    /// The page showed text that is not a number.
    Malformed(String),
}

impl Figure {
    pub fn parse(text: Option<&str>) -> Self {
        match text.map(parse_locale_number) {
            Some(Ok(value)) => Figure::Value(value),
            Some(Err(e)) => Figure::Malformed(e.raw().to_string()),
            None => Figure::Absent,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Figure::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl Display for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Figure::Value(v) => write!(f, "{v}"),
            Figure::Absent => write!(f, "N/D"),
            Figure::Malformed(raw) => write!(f, "invalid({raw})"),
        }
    }
}

/// Indicators of one asset, ready for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub ticker: String,
    pub share_count: f64,
    pub quote: Figure,
    pub price_to_book: Figure,
    pub avg_dividend: DividendAverage,
    pub dividend_yield_12m: Option<String>,
    pub fund_type: Option<String>,
    pub segment: Option<String>,
    pub book_value: Option<String>,
    pub shareholder_count: Option<String>,
    /// Set when the page could not be rendered; every indicator is then absent.
    pub render_error: Option<String>,
}

impl AssetRecord {
    pub fn from_indicators(input: &AssetInput, indicators: IndicatorSet) -> Self {
        Self {
            ticker: input.display_ticker(),
            share_count: input.share_count,
            quote: Figure::parse(indicators.quote.as_deref()),
            price_to_book: Figure::parse(indicators.price_to_book.as_deref()),
            avg_dividend: indicators.avg_dividend,
            dividend_yield_12m: indicators.dividend_yield_12m,
            fund_type: indicators.fund_type,
            segment: indicators.segment,
            book_value: indicators.book_value,
            shareholder_count: indicators.shareholder_count,
            render_error: None,
        }
    }

    pub fn render_failed(input: &AssetInput, error: &RenderError) -> Self {
        Self {
            render_error: Some(error.to_string()),
            ..Self::from_indicators(input, IndicatorSet::default())
        }
    }
}

/// Rendered page stored on disk for the duration of one asset's extraction.
/// The file is removed when the artifact is dropped.
#[derive(Debug)]
pub struct PageArtifact {
    path: PathBuf,
}

impl PageArtifact {
    pub fn file_name(ticker: &str) -> String {
        format!("pagina_{ticker}.html")
    }

    pub fn create(dir: &Path, ticker: &str, html: &str) -> Result<Self, AssetError> {
        let artifact = PageArtifact {
            path: dir.join(Self::file_name(ticker)),
        };
        fs::write(&artifact.path, html).map_err(|source| AssetError::Artifact {
            path: artifact.path.clone(),
            source,
        })?;
        debug!(path = %artifact.path.display(), "Saved rendered page");
        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String, AssetError> {
        fs::read_to_string(&self.path).map_err(|source| AssetError::Artifact {
            path: self.path.clone(),
            source,
        })
    }
}

impl Drop for PageArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed rendered page"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Rendered page already removed")
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to remove rendered page")
            }
        }
    }
}

/// Parses a stored page and extracts its indicators.
pub fn extract_from_artifact(artifact: &PageArtifact) -> Result<IndicatorSet, AssetError> {
    let html = artifact.read()?;
    let page = ParsedPage::parse(&html);
    Ok(indicators::extract(&page.root()))
}

/// Runs render, parse and extraction for one asset at a time.
pub struct AssetProcessor<'a> {
    renderer: &'a dyn PageRenderer,
    base_url: String,
    work_dir: PathBuf,
    block_policy: ResourceBlockPolicy,
}

impl<'a> AssetProcessor<'a> {
    pub fn new(
        renderer: &'a dyn PageRenderer,
        base_url: &str,
        work_dir: &Path,
        block_policy: ResourceBlockPolicy,
    ) -> Self {
        AssetProcessor {
            renderer,
            base_url: base_url.trim_end_matches('/').to_string(),
            work_dir: work_dir.to_path_buf(),
            block_policy,
        }
    }

    pub fn asset_url(&self, ticker: &str) -> String {
        format!("{}/fiis/{}/", self.base_url, ticker.trim().to_lowercase())
    }

    #[instrument(name = "ProcessAsset", skip(self, input), fields(ticker = %input.display_ticker()))]
    pub async fn process(&self, input: &AssetInput) -> Result<AssetRecord, AssetError> {
        let ticker = input.display_ticker();
        let request = RenderRequest {
            url: self.asset_url(&ticker),
            block_policy: self.block_policy.clone(),
        };
        debug!(url = %request.url, "Rendering page");
        let html = self.renderer.render(&request).await?;
        info!(bytes = html.len(), "Rendered page for {}", ticker);

        let indicators = {
            let artifact = PageArtifact::create(&self.work_dir, &ticker, &html)?;
            extract_from_artifact(&artifact)?
        };
        for indicator in Indicator::ALL {
            let text = indicators.get(indicator);
            debug!(%indicator, text = text.as_deref().unwrap_or("N/D"), "Extracted indicator");
        }

        Ok(AssetRecord::from_indicators(input, indicators))
    }
}
