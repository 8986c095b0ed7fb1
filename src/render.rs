//! Terminal rendering of analysis results.
//!
//! The results page has three sections, each of which renders on its own
//! and shows a placeholder while loading or when there is nothing to show:
//!
//! - [`AnalysisSection`] — status code badge, content length, service name.
//! - [`HeadersSection`] — protocol version badge and header rows.
//! - [`BodySection`] — content badge, view toggles and the body itself.
//!
//! Sections expose their parts as data and implement [`Display`](std::fmt::Display)
//! for the CLI. Preview mode goes through [`markup_to_text`].

/// Rendered-markup approximation.
pub mod preview;
/// Result page sections.
pub mod sections;

pub use preview::markup_to_text;
pub use sections::{
    AnalysisSection, Badge, BadgeVariant, BodyContent, BodySection, HeadersSection, ResultsPage, SectionState,
};
