//! The four verify/decide pipelines and the workflow machinery they share.
//!
//! Every pipeline is the same short linear workflow: validate the form,
//! submit it through the transport under a submission guard, and hand the
//! result to the results route. Pipelines differ only in input shape,
//! endpoint and how their result is interpreted.

pub mod types;
pub mod validation;
pub mod transport;
pub mod http;
pub mod guard;
pub mod controller;
pub mod interpret;

pub use types::*;
pub use validation::*;
pub use transport::*;
pub use guard::*;
pub use controller::*;

use serde::Serialize;

use crate::navigation::Route;

/// One of the four independent verify/decide flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    Pan,
    Aadhaar,
    Loan,
    Ai,
}

impl Pipeline {
    pub const ALL: [Pipeline; 4] = [Pipeline::Pan, Pipeline::Aadhaar, Pipeline::Loan, Pipeline::Ai];

    /// Route holding the pipeline's input form.
    pub fn input_route(self) -> Route {
        match self {
            Self::Pan => Route::PanVerification,
            Self::Aadhaar => Route::AadhaarVerification,
            Self::Loan => Route::LoanApplication,
            Self::Ai => Route::AiSuggestions,
        }
    }

    /// Route the transfer object is delivered to on success.
    pub fn results_route(self) -> Route {
        match self {
            Self::Pan => Route::PanResults,
            Self::Aadhaar => Route::AadhaarResults,
            Self::Loan => Route::LoanResults,
            Self::Ai => Route::AiResults,
        }
    }

    /// Collaborator path, relative to the service endpoint.
    pub fn endpoint_path(self) -> &'static str {
        match self {
            Self::Pan => "/extract-pan",
            Self::Aadhaar => "/extract-aadhaar",
            Self::Loan => "/process-loan",
            Self::Ai => "/groq-suggest",
        }
    }

    /// Message shown when the collaborator rejects a request without
    /// supplying its own error text.
    pub fn default_failure_message(self) -> &'static str {
        match self {
            Self::Pan => "Failed to process PAN card",
            Self::Aadhaar => "Failed to process Aadhaar card",
            Self::Loan => "Failed to process loan application",
            Self::Ai => "Failed to get AI suggestions",
        }
    }
}

impl std::fmt::Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pan => write!(f, "PAN"),
            Self::Aadhaar => write!(f, "Aadhaar"),
            Self::Loan => write!(f, "Loan"),
            Self::Ai => write!(f, "AI"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_distinct_per_pipeline() {
        for pipeline in Pipeline::ALL {
            assert_ne!(pipeline.input_route(), pipeline.results_route());
            assert_eq!(pipeline.results_route().pipeline(), Some(pipeline));
            assert_eq!(pipeline.input_route().pipeline(), Some(pipeline));
        }
    }

    #[test]
    fn endpoint_paths_match_collaborator_contract() {
        assert_eq!(Pipeline::Pan.endpoint_path(), "/extract-pan");
        assert_eq!(Pipeline::Aadhaar.endpoint_path(), "/extract-aadhaar");
        assert_eq!(Pipeline::Loan.endpoint_path(), "/process-loan");
        assert_eq!(Pipeline::Ai.endpoint_path(), "/groq-suggest");
    }

    #[test]
    fn pipeline_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Pipeline::Aadhaar).unwrap(), "\"aadhaar\"");
        assert_eq!(serde_json::to_string(&Pipeline::Ai).unwrap(), "\"ai\"");
    }

    #[test]
    fn display_names() {
        assert_eq!(Pipeline::Pan.to_string(), "PAN");
        assert_eq!(Pipeline::Ai.to_string(), "AI");
    }
}
