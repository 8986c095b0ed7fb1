use crate::body::BodyViewModel;
use crate::net::AnalysisResult;
use crate::render::{ResultsPage, SectionState};
use crate::storage::{Handoff, HandoffBuffer};

/// How the results view came by its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// A well-formed result was taken from the buffer
    Loaded,
    /// The buffer held something unreadable; it was cleared and ignored
    Discarded(String),
    /// The buffer was empty
    Absent,
}

/// The results view after loading.
///
/// Loading takes the value out of the handoff buffer, so a second view
/// loaded from the same buffer is empty.
#[derive(Debug, Clone)]
pub struct ResultsView {
    result: Option<AnalysisResult>,
    body: BodyViewModel,
    status: LoadStatus,
}

impl ResultsView {
    pub fn load(buffer: &HandoffBuffer) -> Self {
        match buffer.take() {
            Handoff::Ready(result) => Self::from_result(result),
            Handoff::Malformed(reason) => Self {
                status: LoadStatus::Discarded(reason),
                ..Self::empty()
            },
            Handoff::Absent => Self::empty(),
        }
    }

    pub fn from_result(result: AnalysisResult) -> Self {
        let body = BodyViewModel::new(result.body.clone());
        Self {
            result: Some(result),
            body,
            status: LoadStatus::Loaded,
        }
    }

    pub fn empty() -> Self {
        Self {
            result: None,
            body: BodyViewModel::default(),
            status: LoadStatus::Absent,
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_none()
    }

    pub fn body(&self) -> &BodyViewModel {
        &self.body
    }

    /// Toggles live here; the result itself is never modified.
    pub fn body_mut(&mut self) -> &mut BodyViewModel {
        &mut self.body
    }

    pub fn page(&self) -> ResultsPage<'_> {
        let result = SectionState::from(self.result.as_ref());
        let body = result.map(|_| &self.body);
        ResultsPage::new(result, body)
    }
}
