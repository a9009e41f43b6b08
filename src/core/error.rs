//! Error taxonomy for the extraction pipeline.
//!
//! A missing DOM element is not an error: the extractor reports it as `None`.

use thiserror::Error;

/// A numeric string could not be parsed after locale normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed number: {raw:?}")]
pub struct FormatError {
    raw: String,
}

impl FormatError {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The text that failed to parse.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// The page renderer failed to produce HTML for a URL.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to launch renderer {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer exited with {status} for {url}: {stderr}")]
    Process {
        url: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("empty page rendered for {url}")]
    Empty { url: String },
}

/// Failure while processing a single asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to store rendered page at {}: {source}", .path.display())]
    Artifact {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
