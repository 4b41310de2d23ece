use std::collections::BTreeMap;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// ═══════════════════════════════════════════════════════════
// Document pipelines (PAN / Aadhaar)
// ═══════════════════════════════════════════════════════════

/// Image formats the document picker advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeHint {
    Png,
    Jpg,
    Jpeg,
}

impl MimeHint {
    /// Derive the hint from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg | Self::Jpeg => "image/jpeg",
        }
    }
}

/// A selected document image, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_hint: Option<MimeHint>,
}

impl VerificationRequest {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_hint = MimeHint::from_file_name(&file_name);
        Self {
            file_name,
            bytes,
            mime_hint,
        }
    }

    /// Read a document from disk. The file name is the path's final component.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Content type for the multipart part. Files outside the advertised
    /// formats are still sent, typed by their extension.
    pub fn content_type(&self) -> String {
        match self.mime_hint {
            Some(hint) => hint.mime_type().to_string(),
            None => mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }
}

/// Input state of a document form: at most one selected file.
#[derive(Debug, Clone, Default)]
pub struct DocumentForm {
    file: Option<VerificationRequest>,
}

impl DocumentForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a file, replacing any previous selection wholesale.
    pub fn select(&mut self, request: VerificationRequest) {
        self.file = Some(request);
    }

    pub fn file(&self) -> Option<&VerificationRequest> {
        self.file.as_ref()
    }
}

/// Normalised OCR outcome for either document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub valid: bool,
    pub extracted_number: Option<String>,
    pub extracted_text: Option<String>,
}

/// Wire body of `POST /extract-pan`.
#[derive(Debug, Deserialize)]
pub struct PanExtraction {
    #[serde(default)]
    pub valid: bool,
    pub pan_number: Option<String>,
    pub extracted_text: Option<String>,
}

/// Wire body of `POST /extract-aadhaar`.
#[derive(Debug, Deserialize)]
pub struct AadhaarExtraction {
    #[serde(default)]
    pub valid: bool,
    pub aadhaar_number: Option<String>,
    pub extracted_text: Option<String>,
}

impl From<PanExtraction> for VerificationResult {
    fn from(body: PanExtraction) -> Self {
        Self {
            valid: body.valid,
            extracted_number: body.pan_number,
            extracted_text: body.extracted_text,
        }
    }
}

impl From<AadhaarExtraction> for VerificationResult {
    fn from(body: AadhaarExtraction) -> Self {
        Self {
            valid: body.valid,
            extracted_number: body.aadhaar_number,
            extracted_text: body.extracted_text,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Loan pipeline
// ═══════════════════════════════════════════════════════════

/// The ten named fields of a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanField {
    NoOfDependents,
    IncomeAnnum,
    LoanAmount,
    LoanTerm,
    CibilScore,
    ResidentialAssetsValue,
    CommercialAssetsValue,
    LuxuryAssetsValue,
    BankAssetValue,
    SelfEmployed,
}

impl LoanField {
    /// Form order, as sent on the wire.
    pub const ALL: [LoanField; 10] = [
        LoanField::NoOfDependents,
        LoanField::IncomeAnnum,
        LoanField::LoanAmount,
        LoanField::LoanTerm,
        LoanField::CibilScore,
        LoanField::ResidentialAssetsValue,
        LoanField::CommercialAssetsValue,
        LoanField::LuxuryAssetsValue,
        LoanField::BankAssetValue,
        LoanField::SelfEmployed,
    ];

    pub const REQUIRED: [LoanField; 6] = [
        LoanField::NoOfDependents,
        LoanField::IncomeAnnum,
        LoanField::LoanAmount,
        LoanField::LoanTerm,
        LoanField::CibilScore,
        LoanField::SelfEmployed,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::NoOfDependents => "no_of_dependents",
            Self::IncomeAnnum => "income_annum",
            Self::LoanAmount => "loan_amount",
            Self::LoanTerm => "loan_term",
            Self::CibilScore => "cibil_score",
            Self::ResidentialAssetsValue => "residential_assets_value",
            Self::CommercialAssetsValue => "commercial_assets_value",
            Self::LuxuryAssetsValue => "luxury_assets_value",
            Self::BankAssetValue => "bank_asset_value",
            Self::SelfEmployed => "self_employed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoOfDependents => "Number of Dependents",
            Self::IncomeAnnum => "Annual Income",
            Self::LoanAmount => "Loan Amount",
            Self::LoanTerm => "Loan Term (months)",
            Self::CibilScore => "CIBIL Score",
            Self::ResidentialAssetsValue => "Residential Assets Value",
            Self::CommercialAssetsValue => "Commercial Assets Value",
            Self::LuxuryAssetsValue => "Luxury Assets Value",
            Self::BankAssetValue => "Bank Asset Value",
            Self::SelfEmployed => "Self Employed",
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

/// Employment status values the decisioning service's encoder knows.
///
/// The "Yes" literal carries a leading space in the service schema; it is
/// sent exactly as the service expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfEmployed {
    No,
    Yes,
}

impl SelfEmployed {
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::No => "No",
            Self::Yes => " Yes",
        }
    }
}

/// Loan application form: field name to raw, unparsed text.
///
/// Numeric parsing is left to the decisioning service; the form never
/// range-checks or normalises what the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanApplicationForm {
    values: BTreeMap<LoanField, String>,
}

impl LoanApplicationForm {
    /// An empty form: every field present, every value blank.
    pub fn new() -> Self {
        Self {
            values: LoanField::ALL
                .iter()
                .map(|field| (*field, String::new()))
                .collect(),
        }
    }

    pub fn set(&mut self, field: LoanField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn with(mut self, field: LoanField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: LoanField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Required fields holding an empty string, in form order.
    pub fn missing_required(&self) -> Vec<LoanField> {
        LoanField::REQUIRED
            .iter()
            .copied()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }
}

impl Default for LoanApplicationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for LoanApplicationForm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(LoanField::ALL.len()))?;
        for field in LoanField::ALL {
            map.serialize_entry(field.wire_name(), self.get(field))?;
        }
        map.end()
    }
}

/// Decision returned by `POST /process-loan`. Never recomputed locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDecision {
    pub final_decision: String,
    pub rule_based: RuleBasedAssessment,
    pub ml_prediction: MlPrediction,
    pub groq_suggestion: GroqSuggestion,
    pub verification_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBasedAssessment {
    pub approved: bool,
    pub rules_passed: i64,
    pub total_rules: i64,
    pub rule_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlPrediction {
    pub prediction: String,
    /// Probability in `0.0..=1.0`.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroqSuggestion {
    pub suggestion: String,
}

// ═══════════════════════════════════════════════════════════
// AI pipeline
// ═══════════════════════════════════════════════════════════

/// Wire body of `POST /groq-suggest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggestion: String,
}

/// A prompt and the text generated for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiExchange {
    pub prompt: String,
    pub suggestion: String,
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
