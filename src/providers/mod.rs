pub mod chrome;
pub mod http;

use crate::core::config::{RendererConfig, RendererKind};
use crate::core::render::PageRenderer;
use anyhow::Result;
use std::time::Duration;

/// Builds the page renderer selected in the configuration.
pub fn build_renderer(config: &RendererConfig) -> Result<Box<dyn PageRenderer>> {
    Ok(match config.kind {
        RendererKind::Http => Box::new(http::HttpPageRenderer::new(&config.user_agent)?),
        RendererKind::Chrome => Box::new(chrome::ChromeRenderer::new(
            &config.chrome_path,
            Duration::from_millis(config.settle_ms),
        )),
    })
}
