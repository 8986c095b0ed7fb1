//! Response body classification and display.
//!
//! A response body is an opaque, untrusted string. This module decides what
//! it looks like and how to show it:
//!
//! - [`classify`] maps a body to a [`ContentKind`] (JSON, markup or text).
//! - [`pretty_print`] reindents markup and never fails: malformed input is
//!   returned unchanged.
//! - [`BodyViewModel`] holds the code/preview and raw/pretty toggles and
//!   derives a [`DisplayPayload`] for the current combination.
//!
//! Everything here is synchronous and side-effect free. Nothing is cached;
//! every call derives its output from the body and the view state.

/// Content classification.
pub mod classify;
/// Markup beautifier.
pub mod markup;
/// View state and display derivation.
pub mod view;

pub use classify::{classify, ContentKind};
pub use markup::pretty_print;
pub use view::{render, BodyViewModel, BodyViewState, DisplayPayload, Formatting, ViewMode};
