//! Loan decision view.
//!
//! The decision, scores and prediction come from the decisioning service
//! and are only formatted and branched on here, never recomputed.
//! Pass counts are shown as given; `rules_passed <= total_rules` is not
//! checked.

use serde::Serialize;

use super::{Badge, EmptyState, Rendered, Tone};
use crate::navigation::TransferObject;
use crate::pipeline::{LoanApplicationForm, LoanDecision, LoanField, Pipeline};

/// Final decision of the decisioning service.
///
/// Only the two exact literals are recognised; any other string, including
/// differently-cased variants, is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Rejected,
    Other(String),
}

impl Verdict {
    pub fn parse(decision: &str) -> Self {
        match decision {
            "APPROVED" => Self::Approved,
            "REJECTED" => Self::Rejected,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Approved => Tone::Positive,
            Self::Rejected => Tone::Negative,
            Self::Other(_) => Tone::Neutral,
        }
    }
}

/// Confidence as a label and a bar, both derived from the same scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceView {
    /// As received, `0.0..=1.0`.
    pub fraction: f64,
    /// `confidence * 100` to one decimal place, ties rounded away from zero,
    /// with a `%` suffix.
    pub label: String,
    /// Bar fill in percent: `confidence * 100`.
    pub bar_width: f64,
}

impl ConfidenceView {
    pub fn new(confidence: f64) -> Self {
        let percent = confidence * 100.0;
        // `{:.1}` alone rounds exact ties to even.
        let rounded = (percent * 10.0).round() / 10.0;
        Self {
            fraction: confidence,
            label: format!("{rounded:.1}%"),
            bar_width: percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleBasedView {
    pub decision: Badge,
    /// `rules_passed/total_rules`
    pub rules: String,
    /// `rule_score/100`
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MlView {
    pub prediction: Badge,
    pub confidence: ConfidenceView,
}

/// Echo of the submitted form, formatted for reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub loan_amount: String,
    pub annual_income: String,
    pub cibil_score: String,
    pub loan_term: String,
    pub dependents: String,
    pub verification_score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanView {
    pub decision: Badge,
    pub rule_based: RuleBasedView,
    pub ml_prediction: MlView,
    pub suggestion: String,
    pub summary: ApplicationSummary,
}

pub fn interpret_loan(decision: &LoanDecision, form: &LoanApplicationForm) -> LoanView {
    let verdict = Verdict::parse(&decision.final_decision);

    let rules = &decision.rule_based;
    let rule_based = RuleBasedView {
        decision: if rules.approved {
            Badge::new(Tone::Positive, "APPROVED")
        } else {
            Badge::new(Tone::Negative, "REJECTED")
        },
        rules: format!("{}/{}", rules.rules_passed, rules.total_rules),
        score: format!("{}/100", rules.rule_score),
    };

    let ml = &decision.ml_prediction;
    let prediction_tone = if ml.prediction == "APPROVED" {
        Tone::Positive
    } else {
        Tone::Negative
    };

    LoanView {
        decision: Badge::new(verdict.tone(), decision.final_decision.clone()),
        rule_based,
        ml_prediction: MlView {
            prediction: Badge::new(prediction_tone, ml.prediction.clone()),
            confidence: ConfidenceView::new(ml.confidence),
        },
        suggestion: decision.groq_suggestion.suggestion.clone(),
        summary: ApplicationSummary {
            loan_amount: format_amount(form.get(LoanField::LoanAmount)),
            annual_income: format_amount(form.get(LoanField::IncomeAnnum)),
            cibil_score: form.get(LoanField::CibilScore).to_string(),
            loan_term: format!("{} months", form.get(LoanField::LoanTerm)),
            dependents: form.get(LoanField::NoOfDependents).to_string(),
            verification_score: format!("{}/100", decision.verification_score),
        },
    }
}

/// `$` plus the leading integer of `raw` with thousands separators.
///
/// Mirrors integer-prefix parsing: surrounding whitespace and anything after
/// the leading digits are ignored. Text without a leading integer is shown
/// as typed.
pub fn format_amount(raw: &str) -> String {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return raw.to_string();
    }

    let significant = digits.trim_start_matches('0');
    let significant = if significant.is_empty() { "0" } else { significant };

    let mut grouped = String::with_capacity(significant.len() + significant.len() / 3);
    for (i, ch) in significant.chars().enumerate() {
        if i > 0 && (significant.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative && significant != "0" {
        format!("$-{grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn render_loan(state: Option<TransferObject>) -> Rendered<LoanView> {
    match state {
        Some(TransferObject::Loan(t)) => Rendered::Ready(interpret_loan(&t.result, &t.context)),
        _ => Rendered::Empty(EmptyState::for_pipeline(Pipeline::Loan)),
    }
}
