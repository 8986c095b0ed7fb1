//! Events published by the analyze flow.
//!
//! - [`RequestId`]: Identifies one submission across log lines and events.
//! - [`Route`]: Where the flow asks the front end to go.
//! - [`ToastLevel`]: Severity of a user-visible message.
//! - [`FlowEvent`]: Everything the front end reacts to.

use std::fmt::{self, Display};
use tokio::sync::broadcast;
use uuid::Uuid;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// A handle for receiving flow events.
pub type Subscription = broadcast::Receiver<FlowEvent>;

/// Unique identifier of one submission.
///
/// A fresh `RequestId` is minted for every accepted submission. Treat it as
/// an opaque handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Create a new unique `RequestId` using a random UUID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Route {
    /// The results view
    Results,
}

impl Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Results => write!(f, "/results"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

/// Events emitted by [`AnalyzeFlow`](crate::flow::AnalyzeFlow).
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// A URL was accepted and the analyzer is being called
    Submitted { request_id: RequestId, url: String },
    /// A message for the user
    Toast { level: ToastLevel, message: String },
    /// The front end should switch views
    Navigate { request_id: RequestId, route: Route },
    /// The flow is ready for the next submission
    Idle,
}

#[derive(Debug)]
pub(crate) struct FlowBus {
    tx: broadcast::Sender<FlowEvent>,
}

impl Default for FlowBus {
    fn default() -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl FlowBus {
    pub(crate) fn subscribe(&self) -> Subscription {
        self.tx.subscribe()
    }

    pub(crate) fn publish(&self, ev: FlowEvent) {
        // send() only fails without receivers; nobody listening is fine.
        let _ = self.tx.send(ev);
    }
}
