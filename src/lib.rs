//! Submit a URL to an analyzer service and inspect what came back.
//!
//! The analyzer service probes the URL; this crate handles everything
//! around it:
//!
//! - [`flow`] validates input, calls the analyzer and hands the result to
//!   the results view through a one-shot [`storage::HandoffBuffer`].
//! - [`body`] classifies the response body as JSON, markup or text and
//!   derives what to show for each code/preview and raw/pretty combination.
//! - [`render`] lays the results page out as text.
//!
//! ```no_run
//! use std::sync::Arc;
//! use response_analyzer::{AnalyzeFlow, AnalyzerConfig, HttpAnalyzer, ResultsView};
//! use response_analyzer::storage::{HandoffBuffer, InMemoryStorageArea};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = AnalyzerConfig::default();
//! let buffer = HandoffBuffer::new(Arc::new(InMemoryStorageArea::new()), config.handoff_key.clone());
//! let flow = AnalyzeFlow::new(HttpAnalyzer::from_config(&config)?, buffer);
//!
//! flow.submit("https://example.com").await?;
//! println!("{}", ResultsView::load(flow.buffer()).page());
//! # Ok(()) }
//! ```

pub mod body;
pub mod config;
pub mod errors;
pub mod flow;
pub mod net;
pub mod render;
pub mod storage;

pub use config::AnalyzerConfig;
pub use errors::AnalyzerError;
pub use flow::{AnalyzeFlow, ResultsView};
pub use net::{AnalysisResult, Analyzer, HttpAnalyzer};
