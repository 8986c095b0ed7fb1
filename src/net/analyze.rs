use crate::config::AnalyzerConfig;
use crate::errors::AnalyzerError;
use crate::net::{AnalysisResult, Analyzer};
use async_trait::async_trait;
use http::header::ACCEPT;
use serde::Serialize;
use url::Url;

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
}

/// Analyzer backed by the HTTP analyzer service.
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpAnalyzer {
    /// Builds the HTTP client from the config. No timeout unless one is configured.
    pub fn from_config(config: &AnalyzerConfig) -> anyhow::Result<Self> {
        let endpoint = config.endpoint_url()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalyzerError> {
        log::debug!("POST {} for {}", self.endpoint, url);

        let res = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .json(&AnalyzeRequest { url })
            .send()
            .await?;

        let status = res.status();
        // Note: fully buffered, the body size is not bounded
        let text = res.text().await?;

        if !status.is_success() {
            log::warn!("analyzer returned {} for {}", status, url);
            return Err(AnalyzerError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        AnalysisResult::from_json(&text).map_err(|e| {
            log::warn!("analyzer response for {} did not parse: {}", url, e);
            AnalyzerError::MalformedResponse(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn from_config_uses_endpoint() {
        let config = AnalyzerConfig::builder()
            .endpoint("http://127.0.0.1:9/analyze")
            .request_timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let analyzer = HttpAnalyzer::from_config(&config).unwrap();
        assert_eq!(analyzer.endpoint().as_str(), "http://127.0.0.1:9/analyze");
    }

    #[test]
    fn from_config_rejects_unvalidated_endpoint() {
        let config = AnalyzerConfig {
            endpoint: "not a url".into(),
            ..Default::default()
        };
        assert!(HttpAnalyzer::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = AnalyzerConfig::builder()
            .endpoint(format!("http://127.0.0.1:{port}/analyze"))
            .build()
            .unwrap();
        let analyzer = HttpAnalyzer::from_config(&config).unwrap();

        let err = analyzer.analyze("https://example.com").await.unwrap_err();
        assert!(matches!(err, AnalyzerError::Net(_)));
        assert!(!err.is_input_error());
        assert!(err.user_message().starts_with("Failed to analyze URL: "));
    }
}
