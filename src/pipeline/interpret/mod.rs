//! Render-time interpretation of transfer objects.
//!
//! Every function here is pure: it takes whatever the results route was
//! handed (possibly nothing) and produces the view to show. Missing state is
//! not an error; it renders as an empty view pointing back at the input
//! route.

pub mod ai;
pub mod document;
pub mod loan;

pub use ai::*;
pub use document::*;
pub use loan::*;

use serde::Serialize;

use super::Pipeline;
use crate::navigation::Route;

pub const NO_RESULTS_MESSAGE: &str = "No results found. Please go back and try again.";

/// Visual polarity of a badge or icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    /// Cautionary / secondary.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub tone: Tone,
    pub label: String,
}

impl Badge {
    pub fn new(tone: Tone, label: impl Into<String>) -> Self {
        Self {
            tone,
            label: label.into(),
        }
    }
}

/// What a results route shows when it was entered without a transfer object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub message: String,
    pub back_label: String,
    pub back_route: Route,
}

impl EmptyState {
    pub fn for_pipeline(pipeline: Pipeline) -> Self {
        let back_route = pipeline.input_route();
        Self {
            message: NO_RESULTS_MESSAGE.to_string(),
            back_label: format!("Back to {}", back_route.title()),
            back_route,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Rendered<V> {
    Ready(V),
    Empty(EmptyState),
}

impl<V> Rendered<V> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    pub fn ready(self) -> Option<V> {
        match self {
            Self::Ready(view) => Some(view),
            Self::Empty(_) => None,
        }
    }
}
