//! From URL input to results view.
//!
//! [`AnalyzeFlow`] validates the input, calls the [`Analyzer`](crate::net::Analyzer),
//! writes the result into the [`HandoffBuffer`](crate::storage::HandoffBuffer)
//! and asks for navigation. [`ResultsView`] is the other end: it takes the
//! result out of the buffer and builds the results page.
//!
//! ```text
//! Idle -> Submitting -> Success -> navigate
//!              \-> (failure) -> Idle
//! ```
//!
//! User-visible messages and navigation requests are [`FlowEvent`]s on a
//! broadcast channel; see [`AnalyzeFlow::subscribe`].

/// Submission state machine.
pub mod analyze;
/// Event types.
pub mod events;
/// Results page loading.
pub mod results;

pub use analyze::{validate_input, AnalyzeFlow, FlowState};
pub use events::{FlowEvent, RequestId, Route, Subscription, ToastLevel};
pub use results::{LoadStatus, ResultsView};
