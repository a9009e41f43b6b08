use crate::core::render::{ResourceBlockPolicy, ResourceType};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    pub base_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            base_url: "https://investidor10.com.br".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Render with a headless Chromium so client-side scripts run.
    #[default]
    Chrome,
    /// Fetch the main document over HTTP. Script-filled widgets stay empty.
    Http,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RendererConfig {
    pub kind: RendererKind,
    /// Wait after content-loaded for scripts to populate the page.
    pub settle_ms: u64,
    pub blocked_resources: Vec<ResourceType>,
    pub chrome_path: String,
    pub user_agent: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            kind: RendererKind::default(),
            settle_ms: 2000,
            blocked_resources: ResourceType::ALL.to_vec(),
            chrome_path: "chromium".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) fiis/0.1".to_string(),
        }
    }
}

impl RendererConfig {
    pub fn block_policy(&self) -> ResourceBlockPolicy {
        ResourceBlockPolicy::new(self.blocked_resources.iter().copied())
    }
}

/// What to do with an asset whose page cannot be rendered.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderErrorPolicy {
    /// Keep going; the asset is reported with every indicator absent.
    #[default]
    Skip,
    /// Stop the run.
    Abort,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// CSV with `Ticker` and `Ncotas` columns.
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Where rendered pages are stored while being parsed.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub on_render_error: RenderErrorPolicy,
}

fn default_output() -> PathBuf {
    PathBuf::from("saida_arquivo.csv")
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("br", "fiis", "fiis")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
