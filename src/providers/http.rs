use crate::core::error::RenderError;
use crate::core::render::{PageRenderer, RenderRequest};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};

/// Renders a page by fetching its main document.
///
/// Sub-resources are never requested, so any block policy is satisfied, but
/// content filled in by client-side scripts is not available.
pub struct HttpPageRenderer {
    client: reqwest::Client,
}

impl HttpPageRenderer {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(HttpPageRenderer { client })
    }
}

#[async_trait]
impl PageRenderer for HttpPageRenderer {
    #[instrument(
        name = "HttpRender",
        skip(self, request),
        fields(url = %request.url)
    )]
    async fn render(&self, request: &RenderRequest) -> Result<String, RenderError> {
        debug!(blocked = ?request.block_policy, "Requesting main document only");

        let response = self
            .client
            .get(&request.url)
            .header(ACCEPT, "text/html")
            .send()
            .await
            .map_err(|source| RenderError::Http {
                url: request.url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(RenderError::Status {
                url: request.url.clone(),
                status: response.status(),
            });
        }

        let html = response.text().await.map_err(|source| RenderError::Http {
            url: request.url.clone(),
            source,
        })?;

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
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(ticker: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/fiis/{ticker}/");

        Mock::given(method("GET"))
            .and(path(request_path))
            .and(header("accept", "text/html"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn request(server: &MockServer, ticker: &str) -> RenderRequest {
        RenderRequest {
            url: format!("{}/fiis/{ticker}/", server.uri()),
            block_policy: ResourceBlockPolicy::default(),
        }
    }

    #[tokio::test]
    async fn test_successful_render() {
        let body = r#"<html><strong class="livePrice">R$ 10,00</strong></html>"#;
        let mock_server = create_mock_server("mxrf11", 200, body).await;

        let renderer = HttpPageRenderer::new("fiis-test").unwrap();
        let html = renderer.render(&request(&mock_server, "mxrf11")).await.unwrap();
        assert_eq!(html, body);
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock_server = create_mock_server("xpto11", 404, "not found").await;

        let renderer = HttpPageRenderer::new("fiis-test").unwrap();
        let req = request(&mock_server, "xpto11");
        let result = renderer.render(&req).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            format!("HTTP error: 404 Not Found for {}", req.url)
        );
    }

    #[tokio::test]
    async fn test_empty_page() {
        let mock_server = create_mock_server("mxrf11", 200, "  \n").await;

        let renderer = HttpPageRenderer::new("fiis-test").unwrap();
        let result = renderer.render(&request(&mock_server, "mxrf11")).await;
        assert!(matches!(result, Err(RenderError::Empty { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let renderer = HttpPageRenderer::new("fiis-test").unwrap();
        let req = RenderRequest {
            url: "http://127.0.0.1:9/fiis/mxrf11/".to_string(),
            block_policy: ResourceBlockPolicy::default(),
        };
        let result = renderer.render(&req).await;
        assert!(matches!(result, Err(RenderError::Http { .. })));
    }
}
