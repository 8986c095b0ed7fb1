use crate::net::AnalysisResult;
use crate::storage::StorageArea;
use std::sync::Arc;

/// Outcome of reading the handoff buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Handoff {
    /// A well-formed result was waiting
    Ready(AnalysisResult),
    /// Something was stored under the key but it did not parse
    Malformed(String),
    /// Nothing was stored
    Absent,
}

impl Handoff {
    /// Malformed values are treated like absent ones.
    pub fn into_result(self) -> Option<AnalysisResult> {
        match self {
            Handoff::Ready(result) => Some(result),
            Handoff::Malformed(_) | Handoff::Absent => None,
        }
    }
}

/// Single-slot buffer carrying one [`AnalysisResult`] to the results view.
///
/// Written once by the analyze flow, read once by the results view. Every
/// [`take`](Self::take) clears the slot, whether or not the value parsed.
#[derive(Clone)]
pub struct HandoffBuffer {
    area: Arc<dyn StorageArea>,
    key: String,
}

impl HandoffBuffer {
    pub fn new(area: Arc<dyn StorageArea>, key: impl Into<String>) -> Self {
        Self { area, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stores `result`, replacing anything left over from a previous run.
    pub fn put(&self, result: &AnalysisResult) -> anyhow::Result<()> {
        let json = result.to_json()?;
        self.area.set_item(&self.key, &json)
    }

    /// Reads and clears the slot.
    pub fn take(&self) -> Handoff {
        let Some(raw) = self.area.get_item(&self.key) else {
            return Handoff::Absent;
        };

        if let Err(e) = self.area.remove_item(&self.key) {
            log::warn!("failed to clear handoff buffer '{}': {}", self.key, e);
        }

        match AnalysisResult::from_json(&raw) {
            Ok(result) => Handoff::Ready(result),
            Err(e) => {
                log::warn!("discarding malformed handoff value under '{}': {}", self.key, e);
                Handoff::Malformed(e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for HandoffBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffBuffer").field("key", &self.key).finish_non_exhaustive()
    }
}
