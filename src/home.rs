//! Home page catalogue and the static copy shown around the AI pipeline.

use serde::Serialize;

use crate::navigation::Route;
use crate::pipeline::Pipeline;

// ═══════════════════════════════════════════════════════════
// Feature catalogue
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub pipeline: Pipeline,
    pub title: &'static str,
    pub description: &'static str,
    /// Where choosing the feature navigates.
    pub route: Route,
}

impl Feature {
    fn new(pipeline: Pipeline, title: &'static str, description: &'static str) -> Self {
        Self {
            pipeline,
            title,
            description,
            route: pipeline.input_route(),
        }
    }
}

/// One entry per pipeline, in display order.
pub fn features() -> Vec<Feature> {
    vec![
        Feature::new(
            Pipeline::Pan,
            "PAN Card Verification",
            "Extract and verify PAN card details using OCR technology",
        ),
        Feature::new(
            Pipeline::Aadhaar,
            "Aadhaar Card Verification",
            "Extract and verify Aadhaar card details with OCR",
        ),
        Feature::new(
            Pipeline::Loan,
            "Loan Application",
            "Submit and process loan applications with AI agents",
        ),
        Feature::new(
            Pipeline::Ai,
            "AI Suggestions",
            "Get intelligent suggestions powered by Groq AI",
        ),
    ]
}

// ── AI copy ──

pub const SAMPLE_PROMPTS: [&str; 5] = [
    "How can I improve my CIBIL score to get better loan terms?",
    "What factors should I consider before applying for a home loan?",
    "Explain the difference between fixed and floating interest rates",
    "What documents are typically required for a personal loan application?",
    "How does debt-to-income ratio affect loan approval?",
];

/// Shown on the prompt page.
pub const AI_USAGE_TIPS: [&str; 5] = [
    "Ask specific questions about loans, credit, and financial planning",
    "Request explanations of financial terms and concepts",
    "Get personalized advice based on your financial situation",
    "Ask for tips to improve your loan application",
    "Request comparisons between different loan products",
];

/// Shown under an AI answer.
pub const AI_PRO_TIPS: [&str; 4] = [
    "Save important suggestions for future reference",
    "Ask follow-up questions for more detailed advice",
    "Use specific details about your situation for better recommendations",
    "Consider consulting with a financial advisor for personalized guidance",
];

/// Sample prompt by its 1-based position in the list.
///
/// Choosing a sample replaces the prompt text; it never submits.
pub fn sample_prompt(number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|index| SAMPLE_PROMPTS.get(index))
        .copied()
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub features: Vec<Feature>,
    pub sample_prompts: &'static [&'static str],
}

pub fn home_page() -> HomePage {
    HomePage {
        features: features(),
        sample_prompts: &SAMPLE_PROMPTS,
    }
}
