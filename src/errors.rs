/// Errors produced while submitting a URL to the analyzer service.
///
/// Every variant is recovered at the [`AnalyzeFlow`](crate::flow::AnalyzeFlow)
/// boundary and turned into a user-visible message; none of them is fatal.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Please enter a URL")]
    EmptyUrl,

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("An analysis is already in progress")]
    AlreadySubmitting,

    #[error("HTTP error! Status: {status} - {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Net(#[from] reqwest::Error),

    #[error("Malformed analyzer response: {0}")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AnalyzerError {
    /// Input errors are rejected before any network call is made.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AnalyzerError::EmptyUrl | AnalyzerError::InvalidUrl { .. })
    }

    /// Status code returned by the analyzer, when the failure was a protocol error.
    pub fn status(&self) -> Option<u16> {
        match self {
            AnalyzerError::Status { status, .. } => Some(*status),
            AnalyzerError::Net(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message shown to the user as a toast.
    pub fn user_message(&self) -> String {
        if self.is_input_error() || matches!(self, AnalyzerError::AlreadySubmitting) {
            self.to_string()
        } else {
            format!("Failed to analyze URL: {self}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_carries_code_and_body() {
        let err = AnalyzerError::Status {
            status: 500,
            body: "{\"detail\":\"Internal server error\"}".into(),
        };

        assert_eq!(err.status(), Some(500));
        assert_eq!(
            err.user_message(),
            "Failed to analyze URL: HTTP error! Status: 500 - {\"detail\":\"Internal server error\"}"
        );
    }

    #[test]
    fn input_errors_are_not_prefixed() {
        assert!(AnalyzerError::EmptyUrl.is_input_error());
        assert_eq!(AnalyzerError::EmptyUrl.user_message(), "Please enter a URL");

        let invalid = AnalyzerError::InvalidUrl {
            url: "nope".into(),
            reason: "relative URL without a base".into(),
        };
        assert!(invalid.is_input_error());
        assert!(invalid.user_message().starts_with("Invalid URL 'nope'"));
    }

    #[test]
    fn malformed_response_is_a_failure_not_input() {
        let err = AnalyzerError::MalformedResponse("expected value at line 1".into());
        assert!(!err.is_input_error());
        assert_eq!(err.status(), None);
        assert!(err.user_message().starts_with("Failed to analyze URL: Malformed"));
    }
}
