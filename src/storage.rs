//! Key/value storage backing the results handoff.
//!
//! # Concepts
//!
//! A [`StorageArea`] is a flat string-to-string store in the style of the
//! DOM's `localStorage`. Two backends are provided:
//!
//! - [`InMemoryStorageArea`] — lives as long as the process. Used when the
//!   submit and the results view run in the same process.
//! - [`JsonFileStorageArea`] — one JSON object on disk. Used when `submit`
//!   and `show` are separate invocations.
//!
//! On top of an area, [`HandoffBuffer`] implements the single-slot
//! write-once/read-once buffer that carries an
//! [`AnalysisResult`](crate::net::AnalysisResult) from the analyze flow to
//! the results view.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use response_analyzer::net::AnalysisResult;
//! use response_analyzer::storage::{Handoff, HandoffBuffer, InMemoryStorageArea};
//!
//! let buffer = HandoffBuffer::new(Arc::new(InMemoryStorageArea::new()), "analysisResults");
//! buffer.put(&AnalysisResult::default()).unwrap();
//!
//! assert!(matches!(buffer.take(), Handoff::Ready(_)));
//! assert!(matches!(buffer.take(), Handoff::Absent));
//! ```

/// Storage area trait.
pub mod area;
/// One-shot handoff buffer.
pub mod handoff;
/// Process-local storage area.
pub mod in_memory;
/// File-backed storage area.
pub mod json_file;

pub use area::StorageArea;
pub use handoff::{Handoff, HandoffBuffer};
pub use in_memory::InMemoryStorageArea;
pub use json_file::JsonFileStorageArea;
