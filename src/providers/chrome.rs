use crate::core::error::RenderError;
use crate::core::render::{PageRenderer, RenderRequest, ResourceType};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Renders a page with a headless Chromium and dumps the resulting DOM.
///
/// The settle delay is given to Chromium as a virtual time budget, which lets
/// scripts started after content-loaded finish before the DOM is captured.
pub struct ChromeRenderer {
    program: String,
    settle: Duration,
}

impl ChromeRenderer {
    pub fn new(program: &str, settle: Duration) -> Self {
        ChromeRenderer {
            program: program.to_string(),
            settle,
        }
    }

    fn arguments(&self, request: &RenderRequest) -> Vec<String> {
        let mut args = vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--no-first-run".to_string(),
            format!("--virtual-time-budget={}", self.settle.as_millis()),
        ];
        // Media and stylesheets have no switch; they only cost load time.
        if request.block_policy.blocks(ResourceType::Image) {
            args.push("--blink-settings=imagesEnabled=false".to_string());
        }
        if request.block_policy.blocks(ResourceType::Font) {
            args.push("--disable-remote-fonts".to_string());
        }
        args.push("--dump-dom".to_string());
        args.push(request.url.clone());
        args
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    #[instrument(
        name = "ChromeRender",
        skip(self, request),
        fields(url = %request.url)
    )]
    async fn render(&self, request: &RenderRequest) -> Result<String, RenderError> {
        let args = self.arguments(request);
        debug!(program = %self.program, ?args, "Launching headless browser");

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RenderError::Process {
                url: request.url.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let html = String::from_utf8_lossy(&output.stdout).into_owned();
        if html.trim().is_empty() {
            return Err(RenderError::Empty {
                url: request.url.clone(),
            });
        }
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::ResourceBlockPolicy;

    fn request(block_policy: ResourceBlockPolicy) -> RenderRequest {
        RenderRequest {
            url: "https://investidor10.com.br/fiis/mxrf11/".to_string(),
            block_policy,
        }
    }

    #[test]
    fn test_arguments_follow_block_policy() {
        let renderer = ChromeRenderer::new("chromium", Duration::from_millis(2000));

        let args = renderer.arguments(&request(ResourceBlockPolicy::default()));
        assert!(args.contains(&"--virtual-time-budget=2000".to_string()));
        assert!(args.contains(&"--blink-settings=imagesEnabled=false".to_string()));
        assert!(args.contains(&"--disable-remote-fonts".to_string()));
        assert_eq!(
            args.last().map(String::as_str),
            Some("https://investidor10.com.br/fiis/mxrf11/")
        );

        let args = renderer.arguments(&request(ResourceBlockPolicy::new(Vec::new())));
        assert!(!args.iter().any(|a| a.starts_with("--blink-settings")));
        assert!(!args.contains(&"--disable-remote-fonts".to_string()));
        assert!(args.contains(&"--dump-dom".to_string()));
    }

    #[tokio::test]
    async fn test_missing_browser_is_a_spawn_error() {
        let renderer = ChromeRenderer::new("/nonexistent/chromium-fiis", Duration::ZERO);
        let result = renderer.render(&request(ResourceBlockPolicy::default())).await;
        assert!(matches!(result, Err(RenderError::Spawn { .. })));
    }
}
