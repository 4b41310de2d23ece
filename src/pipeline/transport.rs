use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

use super::types::{
    LoanApplicationForm, LoanDecision, Suggestion, VerificationRequest, VerificationResult,
};
use super::Pipeline;

/// Shown whenever the call itself could not complete.
pub const CONNECT_FAILURE_MESSAGE: &str = "Failed to connect to server";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The service answered with a non-success status.
    #[error("Service rejected the request (status {status})")]
    Rejected { status: u16, message: Option<String> },

    /// Connection, DNS or body-parsing failure.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    /// Text for the failure notification.
    ///
    /// A rejection surfaces the service's own error text when it sent a
    /// non-empty one, otherwise the pipeline's generic message.
    pub fn user_message(&self, pipeline: Pipeline) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            Self::Rejected { .. } => pipeline.default_failure_message().to_string(),
            Self::Unavailable(_) => CONNECT_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// One single-attempt call per pipeline. Implementations never retry.
pub trait Transport: Send + Sync {
    fn extract_pan(&self, request: &VerificationRequest) -> Result<VerificationResult, TransportError>;

    fn extract_aadhaar(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResult, TransportError>;

    fn process_loan(&self, form: &LoanApplicationForm) -> Result<LoanDecision, TransportError>;

    fn suggest(&self, prompt: &str) -> Result<Suggestion, TransportError>;
}

/// Mock transport for testing: returns configurable outcomes and counts calls.
pub struct MockTransport {
    pan: Result<VerificationResult, TransportError>,
    aadhaar: Result<VerificationResult, TransportError>,
    loan: Result<LoanDecision, TransportError>,
    suggestion: Result<Suggestion, TransportError>,
    calls: AtomicUsize,
}

impl MockTransport {
    /// Every operation fails as if the service were down.
    pub fn unreachable() -> Self {
        let down = || TransportError::Unavailable("connection refused".into());
        Self {
            pan: Err(down()),
            aadhaar: Err(down()),
            loan: Err(down()),
            suggestion: Err(down()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_pan(mut self, outcome: Result<VerificationResult, TransportError>) -> Self {
        self.pan = outcome;
        self
    }

    pub fn with_aadhaar(mut self, outcome: Result<VerificationResult, TransportError>) -> Self {
        self.aadhaar = outcome;
        self
    }

    pub fn with_loan(mut self, outcome: Result<LoanDecision, TransportError>) -> Self {
        self.loan = outcome;
        self
    }

    pub fn with_suggestion(mut self, outcome: Result<Suggestion, TransportError>) -> Self {
        self.suggestion = outcome;
        self
    }

    /// Number of calls made across all operations.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Transport for MockTransport {
    fn extract_pan(&self, _request: &VerificationRequest) -> Result<VerificationResult, TransportError> {
        self.record();
        self.pan.clone()
    }

    fn extract_aadhaar(
        &self,
        _request: &VerificationRequest,
    ) -> Result<VerificationResult, TransportError> {
        self.record();
        self.aadhaar.clone()
    }

    fn process_loan(&self, _form: &LoanApplicationForm) -> Result<LoanDecision, TransportError> {
        self.record();
        self.loan.clone()
    }

    fn suggest(&self, _prompt: &str) -> Result<Suggestion, TransportError> {
        self.record();
        self.suggestion.clone()
    }
}
