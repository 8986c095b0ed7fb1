//! Outbound boundary to the analyzer service.
//!
//! The analyzer probes the target URL on our behalf. We only send it
//! `POST { "url": ... }` and read back an [`AnalysisResult`].

use crate::errors::AnalyzerError;
use async_trait::async_trait;

pub mod analyze;
pub mod response;

pub use analyze::HttpAnalyzer;
pub use response::{AnalysisResult, Headers};

/// Something that can analyze a URL.
///
/// [`HttpAnalyzer`] talks to the real service; tests substitute their own.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Submits `url` for analysis. The URL has already been validated.
    async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalyzerError>;
}
