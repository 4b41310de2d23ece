//! PAN and Aadhaar result views.
//!
//! Validity and detection are separate signals: a number can be detected yet
//! fail the format check, and a result can be valid at the transport level
//! with no number at all.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use super::{Badge, EmptyState, Rendered, Tone};
use crate::navigation::TransferObject;
use crate::pipeline::{Pipeline, VerificationResult};

pub const NO_TEXT_EXTRACTED: &str = "No text extracted";

/// Runs of four ASCII digits, absorbing one space that already follows.
static DIGIT_GROUPS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]{4}) ?").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentView {
    pub pipeline: Pipeline,
    pub file_name: String,
    /// "Valid PAN Format" / "Invalid PAN Format".
    pub validity: Badge,
    /// Display form of the extracted number, when one was detected.
    pub number: Option<String>,
    pub detected: bool,
    pub valid_format: bool,
    /// "Success" / "Needs Review".
    pub processing: Badge,
    pub extracted_text: String,
}

/// Group an Aadhaar number into blocks of four digits separated by single
/// spaces. Nothing else is altered, surrounding whitespace included, and
/// already-grouped input comes back unchanged.
pub fn format_aadhaar(raw: &str) -> String {
    DIGIT_GROUPS
        .replace_all(raw, |caps: &Captures<'_>| {
            let group = &caps[1];
            // A group that ends the input gets no separator after it.
            if caps.get(1).is_some_and(|m| m.end() == raw.len()) {
                group.to_string()
            } else {
                format!("{group} ")
            }
        })
        .into_owned()
}

pub fn interpret_document(
    pipeline: Pipeline,
    result: &VerificationResult,
    file_name: &str,
) -> DocumentView {
    let number = result
        .extracted_number
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(|n| match pipeline {
            Pipeline::Aadhaar => format_aadhaar(n),
            _ => n.to_string(),
        });

    let validity = if result.valid {
        Badge::new(Tone::Positive, format!("Valid {pipeline} Format"))
    } else {
        Badge::new(Tone::Negative, format!("Invalid {pipeline} Format"))
    };

    let processing = if result.valid {
        Badge::new(Tone::Positive, "Success")
    } else {
        Badge::new(Tone::Neutral, "Needs Review")
    };

    let extracted_text = result
        .extracted_text
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(NO_TEXT_EXTRACTED)
        .to_string();

    DocumentView {
        pipeline,
        file_name: file_name.to_string(),
        validity,
        detected: number.is_some(),
        number,
        valid_format: result.valid,
        processing,
        extracted_text,
    }
}

pub fn render_pan(state: Option<TransferObject>) -> Rendered<DocumentView> {
    match state {
        Some(TransferObject::Pan(t)) => {
            Rendered::Ready(interpret_document(Pipeline::Pan, &t.result, &t.context))
        }
        _ => Rendered::Empty(EmptyState::for_pipeline(Pipeline::Pan)),
    }
}

pub fn render_aadhaar(state: Option<TransferObject>) -> Rendered<DocumentView> {
    match state {
        Some(TransferObject::Aadhaar(t)) => {
            Rendered::Ready(interpret_document(Pipeline::Aadhaar, &t.result, &t.context))
        }
        _ => Rendered::Empty(EmptyState::for_pipeline(Pipeline::Aadhaar)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Transfer;

    fn result(valid: bool, number: Option<&str>, text: Option<&str>) -> VerificationResult {
        VerificationResult {
            valid,
            extracted_number: number.map(str::to_string),
            extracted_text: text.map(str::to_string),
        }
    }

    #[test]
    fn aadhaar_grouped_in_fours() {
        assert_eq!(format_aadhaar("123456789012"), "1234 5678 9012");
    }

    #[test]
    fn aadhaar_grouping_is_idempotent() {
        let once = format_aadhaar("123456789012");
        assert_eq!(format_aadhaar(&once), "1234 5678 9012");
    }

    #[test]
    fn aadhaar_partial_group_kept() {
        assert_eq!(format_aadhaar("1234567890"), "1234 5678 90");
        assert_eq!(format_aadhaar("123"), "123");
    }

    #[test]
    fn aadhaar_non_digits_untouched() {
        assert_eq!(format_aadhaar("XXXX-12345678"), "XXXX-1234 5678");
    }

    #[test]
    fn aadhaar_surrounding_whitespace_kept() {
        assert_eq!(format_aadhaar(" 123456789012"), " 1234 5678 9012");
        assert_eq!(format_aadhaar("12345678 "), "1234 5678 ");
        assert_eq!(format_aadhaar("\t1234"), "\t1234");
    }

    #[test]
    fn pan_number_displayed_verbatim() {
        let view = interpret_document(Pipeline::Pan, &result(true, Some("ABCDE1234F"), None), "pan.png");
        assert_eq!(view.number.as_deref(), Some("ABCDE1234F"));
        assert_eq!(view.validity, Badge::new(Tone::Positive, "Valid PAN Format"));
        assert_eq!(view.processing, Badge::new(Tone::Positive, "Success"));
        assert!(view.detected);
        assert_eq!(view.file_name, "pan.png");
    }

    #[test]
    fn detected_but_invalid_is_kept_apart() {
        let view = interpret_document(
            Pipeline::Aadhaar,
            &result(false, Some("123456789012"), Some("GOVT OF INDIA")),
            "a.jpg",
        );
        assert!(view.detected);
        assert!(!view.valid_format);
        assert_eq!(view.validity, Badge::new(Tone::Negative, "Invalid Aadhaar Format"));
        assert_eq!(view.processing, Badge::new(Tone::Neutral, "Needs Review"));
        assert_eq!(view.number.as_deref(), Some("1234 5678 9012"));
        assert_eq!(view.extracted_text, "GOVT OF INDIA");
    }

    #[test]
    fn valid_without_number_is_not_detected() {
        let view = interpret_document(Pipeline::Pan, &result(true, None, None), "pan.png");
        assert!(view.valid_format);
        assert!(!view.detected);
        assert!(view.number.is_none());
        assert_eq!(view.extracted_text, NO_TEXT_EXTRACTED);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let view = interpret_document(Pipeline::Pan, &result(false, Some(""), Some("")), "p.png");
        assert!(!view.detected);
        assert_eq!(view.extracted_text, NO_TEXT_EXTRACTED);
    }

    #[test]
    fn extracted_text_whitespace_preserved() {
        let text = "  INCOME TAX DEPARTMENT\n\tGOVT. OF INDIA  ";
        let view = interpret_document(Pipeline::Pan, &result(true, None, Some(text)), "p.png");
        assert_eq!(view.extracted_text, text);
    }

    #[test]
    fn render_without_state_is_empty() {
        let rendered = render_pan(None);
        assert_eq!(rendered, Rendered::Empty(EmptyState::for_pipeline(Pipeline::Pan)));
        assert!(render_aadhaar(None).is_empty());
    }

    #[test]
    fn render_ignores_other_pipelines_state() {
        let state = TransferObject::Pan(Transfer {
            result: result(true, Some("ABCDE1234F"), None),
            context: "pan.png".into(),
        });
        assert!(render_aadhaar(Some(state.clone())).is_empty());
        assert!(!render_pan(Some(state)).is_empty());
    }
}
