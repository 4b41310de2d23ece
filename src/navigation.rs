//! Route table and the one-shot transfer of results between routes.
//!
//! A successful submission navigates to its results route carrying a single
//! transfer object. The navigator keeps nothing else: the object is handed
//! out once, and any later navigation (including re-entering the same
//! results route) starts without it. A results route reached without a
//! transfer object has no result to show.

use std::sync::Mutex;

use serde::Serialize;

use crate::pipeline::{LoanApplicationForm, LoanDecision, Pipeline, Suggestion, VerificationResult};

// ═══════════════════════════════════════════════════════════
// Routes
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    PanVerification,
    PanResults,
    AadhaarVerification,
    AadhaarResults,
    LoanApplication,
    LoanResults,
    AiSuggestions,
    AiResults,
    NotFound,
}

impl Route {
    /// Every route with a fixed path, in declaration order.
    pub const KNOWN: [Route; 9] = [
        Route::Home,
        Route::PanVerification,
        Route::PanResults,
        Route::AadhaarVerification,
        Route::AadhaarResults,
        Route::LoanApplication,
        Route::LoanResults,
        Route::AiSuggestions,
        Route::AiResults,
    ];

    /// Path of the route. `NotFound` has no path of its own; it reports `*`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::PanVerification => "/pan-verification",
            Self::PanResults => "/pan-results",
            Self::AadhaarVerification => "/aadhaar-verification",
            Self::AadhaarResults => "/aadhaar-results",
            Self::LoanApplication => "/loan-application",
            Self::LoanResults => "/loan-results",
            Self::AiSuggestions => "/ai-suggestions",
            Self::AiResults => "/ai-results",
            Self::NotFound => "*",
        }
    }

    /// Resolve a path. Anything unrecognised is `NotFound`.
    pub fn from_path(path: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|route| route.path() == path)
            .unwrap_or(Self::NotFound)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::PanVerification => "PAN Verification",
            Self::PanResults => "PAN Card Extraction Results",
            Self::AadhaarVerification => "Aadhaar Verification",
            Self::AadhaarResults => "Aadhaar Card Extraction Results",
            Self::LoanApplication => "Loan Application",
            Self::LoanResults => "Loan Application Results",
            Self::AiSuggestions => "AI Suggestions",
            Self::AiResults => "AI Suggestion Results",
            Self::NotFound => "Page not found",
        }
    }

    /// Pipeline the route belongs to, if any.
    pub fn pipeline(self) -> Option<Pipeline> {
        match self {
            Self::PanVerification | Self::PanResults => Some(Pipeline::Pan),
            Self::AadhaarVerification | Self::AadhaarResults => Some(Pipeline::Aadhaar),
            Self::LoanApplication | Self::LoanResults => Some(Pipeline::Loan),
            Self::AiSuggestions | Self::AiResults => Some(Pipeline::Ai),
            Self::Home | Self::NotFound => None,
        }
    }

    pub fn is_results(self) -> bool {
        matches!(
            self,
            Self::PanResults | Self::AadhaarResults | Self::LoanResults | Self::AiResults
        )
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

// ═══════════════════════════════════════════════════════════
// Transfer objects
// ═══════════════════════════════════════════════════════════

/// A result plus the submission context it was produced from.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer<R, C> {
    pub result: R,
    pub context: C,
}

/// Payload carried by exactly one navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferObject {
    /// Context: uploaded file name.
    Pan(Transfer<VerificationResult, String>),
    /// Context: uploaded file name.
    Aadhaar(Transfer<VerificationResult, String>),
    /// Context: snapshot of the submitted form.
    Loan(Transfer<LoanDecision, LoanApplicationForm>),
    /// Context: the prompt as submitted.
    Ai(Transfer<Suggestion, String>),
}

impl TransferObject {
    pub fn pipeline(&self) -> Pipeline {
        match self {
            Self::Pan(_) => Pipeline::Pan,
            Self::Aadhaar(_) => Pipeline::Aadhaar,
            Self::Loan(_) => Pipeline::Loan,
            Self::Ai(_) => Pipeline::Ai,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Navigator
// ═══════════════════════════════════════════════════════════

struct Location {
    route: Route,
    transfer: Option<TransferObject>,
}

pub struct Navigator {
    location: Mutex<Location>,
}

impl Navigator {
    /// Start at the home route with nothing pending.
    pub fn new() -> Self {
        Self::at(Route::Home)
    }

    pub fn at(route: Route) -> Self {
        Self {
            location: Mutex::new(Location {
                route,
                transfer: None,
            }),
        }
    }

    /// Move to `route`, attaching `transfer` for the destination's first
    /// render. Any transfer still pending from an earlier navigation is
    /// discarded.
    pub fn navigate(&self, route: Route, transfer: Option<TransferObject>) {
        tracing::debug!(
            %route,
            pipeline = ?transfer.as_ref().map(TransferObject::pipeline),
            "Navigating"
        );
        if let Ok(mut location) = self.location.lock() {
            location.route = route;
            location.transfer = transfer;
        }
    }

    /// Navigate by path. Unknown paths land on `NotFound`.
    pub fn open(&self, path: &str) -> Route {
        let route = Route::from_path(path);
        self.navigate(route, None);
        route
    }

    pub fn current(&self) -> Route {
        self.location
            .lock()
            .map(|location| location.route)
            .unwrap_or(Route::NotFound)
    }

    /// Hand out the pending transfer object. Subsequent calls return `None`.
    pub fn take_transfer(&self) -> Option<TransferObject> {
        let mut location = self.location.lock().ok()?;
        location.transfer.take()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
