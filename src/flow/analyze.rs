use crate::errors::AnalyzerError;
use crate::flow::events::{FlowBus, FlowEvent, RequestId, Route, Subscription, ToastLevel};
use crate::net::Analyzer;
use crate::storage::HandoffBuffer;
use std::sync::{Mutex, MutexGuard};
use url::Url;

/// Where the flow currently is.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// Waiting for input
    Idle,
    /// The analyzer call for this request is in flight
    Submitting(RequestId),
    /// The result is in the handoff buffer and navigation was requested
    Success(RequestId),
}

/// Validate, analyze, hand off, navigate.
///
/// One request at a time: a submission while another is in flight is
/// rejected with [`AnalyzerError::AlreadySubmitting`]. Every failure is
/// recovered here: the flow goes back to [`FlowState::Idle`] and publishes
/// a toast carrying the error detail.
pub struct AnalyzeFlow<A: Analyzer> {
    analyzer: A,
    buffer: HandoffBuffer,
    state: Mutex<FlowState>,
    bus: FlowBus,
}

impl<A: Analyzer> AnalyzeFlow<A> {
    pub fn new(analyzer: A, buffer: HandoffBuffer) -> Self {
        Self {
            analyzer,
            buffer,
            state: Mutex::new(FlowState::Idle),
            bus: FlowBus::default(),
        }
    }

    pub fn state(&self) -> FlowState {
        *self.lock_state()
    }

    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    pub fn buffer(&self) -> &HandoffBuffer {
        &self.buffer
    }

    /// Submits user input. On success the result is in the handoff buffer
    /// and a [`FlowEvent::Navigate`] to the results view has been published.
    pub async fn submit(&self, input: &str) -> Result<RequestId, AnalyzerError> {
        let url = match validate_input(input) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("rejected input {:?}: {}", input, e);
                self.toast(ToastLevel::Error, e.user_message());
                return Err(e);
            }
        };

        let (request_id, mut guard) = match self.begin() {
            Ok(started) => started,
            Err(e) => {
                self.toast(ToastLevel::Info, e.user_message());
                return Err(e);
            }
        };

        log::info!("[{request_id}] submitting {url} for analysis");
        self.bus.publish(FlowEvent::Submitted {
            request_id,
            url: url.to_string(),
        });

        let outcome = match self.analyzer.analyze(url).await {
            Ok(result) => self
                .buffer
                .put(&result)
                .map_err(|e| AnalyzerError::Storage(format!("{e:#}"))),
            Err(e) => Err(e),
        };
        guard.disarm();

        match outcome {
            Ok(()) => {
                log::info!("[{request_id}] analysis stored under '{}'", self.buffer.key());
                *self.lock_state() = FlowState::Success(request_id);
                self.bus.publish(FlowEvent::Navigate {
                    request_id,
                    route: Route::Results,
                });
                Ok(request_id)
            }
            Err(e) => {
                log::error!("[{request_id}] analysis failed: {e}");
                *self.lock_state() = FlowState::Idle;
                self.toast(ToastLevel::Error, e.user_message());
                self.bus.publish(FlowEvent::Idle);
                Err(e)
            }
        }
    }

    fn begin(&self) -> Result<(RequestId, SubmitGuard<'_>), AnalyzerError> {
        let mut state = self.lock_state();
        if let FlowState::Submitting(_) = *state {
            return Err(AnalyzerError::AlreadySubmitting);
        }

        let request_id = RequestId::new();
        *state = FlowState::Submitting(request_id);
        Ok((request_id, SubmitGuard { state: &self.state, armed: true }))
    }

    fn lock_state(&self) -> MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn toast(&self, level: ToastLevel, message: String) {
        self.bus.publish(FlowEvent::Toast { level, message });
    }
}

/// Puts the flow back to idle if a submission is dropped mid-flight.
struct SubmitGuard<'a> {
    state: &'a Mutex<FlowState>,
    armed: bool,
}

impl SubmitGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = FlowState::Idle;
        }
    }
}

/// Trims the input and checks that it is an absolute URL.
pub fn validate_input(input: &str) -> Result<&str, AnalyzerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalyzerError::EmptyUrl);
    }

    Url::parse(trimmed).map_err(|e| AnalyzerError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;
    Ok(trimmed)
}
