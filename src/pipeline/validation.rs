//! Pre-submission checks. Pure functions; nothing here touches the network.

use thiserror::Error;

use super::types::{DocumentForm, LoanApplicationForm, LoanField, VerificationRequest};

/// Title every validation notice is shown under.
pub const VALIDATION_TITLE: &str = "Error";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a file to upload")]
    NoFileSelected,

    #[error("Please fill in all required fields")]
    MissingRequiredFields(Vec<LoanField>),

    #[error("Please enter a prompt")]
    EmptyPrompt,
}

/// A document form is submittable once a file is selected; the selected
/// file is handed back for upload.
///
/// Content type and size are not checked.
pub fn validate_document(form: &DocumentForm) -> Result<&VerificationRequest, ValidationError> {
    form.file().ok_or(ValidationError::NoFileSelected)
}

/// All six required loan fields must be non-empty. Values are not parsed:
/// sign, range and the employment literal are the service's concern.
pub fn validate_loan(form: &LoanApplicationForm) -> Result<(), ValidationError> {
    let missing = form.missing_required();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredFields(missing))
    }
}

/// The prompt must contain something other than whitespace.
pub fn validate_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.trim().is_empty() {
        Err(ValidationError::EmptyPrompt)
    } else {
        Ok(())
    }
}
