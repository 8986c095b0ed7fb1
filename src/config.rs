//! Analyzer configuration.
//!
//! `AnalyzerConfig` controls where URLs are sent for analysis and how the
//! result is handed over to the results view.
//!
//! `AnalyzerConfig` provides defaults via [`Default`] and a fluent
//! [`AnalyzerConfig::builder()`] for customization with validation.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use response_analyzer::config::AnalyzerConfig;
//! let cfg = AnalyzerConfig::default();
//! assert_eq!(cfg.handoff_key, "analysisResults");
//! assert!(cfg.request_timeout.is_none());
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use std::time::Duration;
//! use response_analyzer::config::AnalyzerConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = AnalyzerConfig::builder()
//!     .endpoint("http://backend:8000/analyze")
//!     .request_timeout(Duration::from_secs(30))
//!     .build()?; // returns Result<AnalyzerConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `endpoint`: URL of the analyzer service (default: `http://localhost:8000/analyze`).
//! - `handoff_key`: Key under which the result is stored for the results view.
//! - `user_agent`: UA string sent to the analyzer service.
//! - `request_timeout`: Optional timeout on the analyzer call (default: none).
//!
//! # Errors
//!
//! Builder validation returns [`ConfigError`] when the endpoint is not an
//! http(s) URL, the handoff key is empty, or the timeout is zero.

use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/analyze";
pub const DEFAULT_HANDOFF_KEY: &str = "analysisResults";
const DEFAULT_USER_AGENT: &str = concat!("response-analyzer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Endpoint receiving `POST { "url": ... }`
    pub endpoint: String,
    /// Fixed key of the one-shot handoff buffer
    pub handoff_key: String,
    /// User agent string for requests to the analyzer
    pub user_agent: String,
    /// No timeout unless explicitly configured
    pub request_timeout: Option<Duration>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            handoff_key: DEFAULT_HANDOFF_KEY.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Parsed endpoint. Only valid after [`AnalyzerConfigBuilder::build`] succeeded.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        parse_endpoint(&self.endpoint)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfigBuilder {
    inner: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut AnalyzerConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn endpoint<S: Into<String>>(self, url: S) -> Self { self.map(|c| c.endpoint = url.into()) }
    pub fn handoff_key<S: Into<String>>(self, key: S) -> Self { self.map(|c| c.handoff_key = key.into()) }
    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = ua.into()) }
    pub fn request_timeout(self, timeout: Duration) -> Self { self.map(|c| c.request_timeout = Some(timeout)) }
    pub fn no_request_timeout(self) -> Self { self.map(|c| c.request_timeout = None) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut AnalyzerConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<AnalyzerConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidEndpoint { endpoint: String, reason: String },
    EmptyHandoffKey,
    ZeroTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEndpoint { endpoint, reason } =>
                write!(f, "analyzer endpoint '{endpoint}' is invalid: {reason}"),
            ConfigError::EmptyHandoffKey =>
                write!(f, "handoff_key must not be empty"),
            ConfigError::ZeroTimeout =>
                write!(f, "request_timeout must be greater than zero"),
        }
    }
}
impl std::error::Error for ConfigError {}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn validate(c: &AnalyzerConfig) -> Result<(), ConfigError> {
    parse_endpoint(&c.endpoint)?;
    if c.handoff_key.is_empty() {
        return Err(ConfigError::EmptyHandoffKey);
    }
    if c.request_timeout == Some(Duration::ZERO) {
        return Err(ConfigError::ZeroTimeout);
    }
    Ok(())
}
