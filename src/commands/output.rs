//! Page rendering for the terminal.
//!
//! Every page is `Serialize` for `--json`; `Render` gives its text form.

use std::io::{self, Write};

use serde::Serialize;

use super::CommandError;
use crate::home::{HomePage, AI_PRO_TIPS, AI_USAGE_TIPS, SAMPLE_PROMPTS};
use crate::navigation::Route;
use crate::pipeline::interpret::{Badge, ConfidenceView, DocumentView, EmptyState, LoanView, Rendered, Tone};
use crate::pipeline::{AiExchange, LoanField, Pipeline};

/// Cells in the confidence bar.
const BAR_CELLS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

pub trait Render {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Write one page: a titled text block, or the page as pretty JSON.
pub fn emit<T>(out: &mut dyn Write, format: Format, title: &str, page: &T) -> Result<(), CommandError>
where
    T: Serialize + Render + ?Sized,
{
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, page)?;
            writeln!(out)?;
        }
        Format::Text => {
            writeln!(out, "{title}")?;
            writeln!(out, "{}", "=".repeat(title.chars().count()))?;
            page.render_text(out)?;
        }
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn badge(badge: &Badge) -> String {
    let marker = match badge.tone {
        Tone::Positive => "✓",
        Tone::Negative => "✗",
        Tone::Neutral => "!",
    };
    format!("{marker} {}", badge.label)
}

/// `[#####...............]`, filled in proportion to `bar_width` percent.
pub fn confidence_bar(confidence: &ConfidenceView) -> String {
    let filled = (confidence.bar_width / 100.0 * BAR_CELLS as f64).round();
    let filled = (filled.max(0.0) as usize).min(BAR_CELLS);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_CELLS - filled))
}

fn bullets(out: &mut dyn Write, items: &[&str]) -> io::Result<()> {
    for item in items {
        writeln!(out, "  - {item}")?;
    }
    Ok(())
}

// ── Results ──

impl<V: Render> Render for Rendered<V> {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        match self {
            Rendered::Ready(view) => view.render_text(out),
            Rendered::Empty(empty) => empty.render_text(out),
        }
    }
}

impl Render for EmptyState {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.message)?;
        writeln!(out, "{} ({})", self.back_label, self.back_route)
    }
}

impl Render for DocumentView {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "File: {}", self.file_name)?;
        match &self.number {
            Some(number) => writeln!(out, "{} Number: {number}", self.pipeline)?,
            None => writeln!(out, "{} Number: Not detected", self.pipeline)?,
        }
        writeln!(out, "Status: {}", badge(&self.validity))?;
        writeln!(out)?;
        writeln!(out, "Processing Summary")?;
        writeln!(out, "  Status: {}", badge(&self.processing))?;
        writeln!(out, "  Number Detected: {}", yes_no(self.detected))?;
        writeln!(out, "  Valid Format: {}", yes_no(self.valid_format))?;
        writeln!(out)?;
        writeln!(out, "Extracted Text")?;
        writeln!(out, "{}", self.extracted_text)
    }
}

impl Render for LoanView {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Decision: {}", badge(&self.decision))?;
        writeln!(out)?;
        writeln!(out, "Rule-Based Assessment")?;
        writeln!(out, "  Decision: {}", badge(&self.rule_based.decision))?;
        writeln!(out, "  Rules Passed: {}", self.rule_based.rules)?;
        writeln!(out, "  Rule Score: {}", self.rule_based.score)?;
        writeln!(out)?;
        writeln!(out, "ML Prediction")?;
        writeln!(out, "  Prediction: {}", badge(&self.ml_prediction.prediction))?;
        let confidence = &self.ml_prediction.confidence;
        writeln!(
            out,
            "  Confidence: {} {}",
            confidence.label,
            confidence_bar(confidence)
        )?;
        writeln!(out)?;
        writeln!(out, "AI Suggestion")?;
        writeln!(out, "{}", self.suggestion)?;
        writeln!(out)?;
        let summary = &self.summary;
        writeln!(out, "Application Summary")?;
        writeln!(out, "  Loan Amount: {}", summary.loan_amount)?;
        writeln!(out, "  Annual Income: {}", summary.annual_income)?;
        writeln!(out, "  CIBIL Score: {}", summary.cibil_score)?;
        writeln!(out, "  Loan Term: {}", summary.loan_term)?;
        writeln!(out, "  Dependents: {}", summary.dependents)?;
        writeln!(out, "  Verification Score: {}", summary.verification_score)
    }
}

impl Render for AiExchange {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Your Question")?;
        writeln!(out, "{}", self.prompt)?;
        writeln!(out)?;
        writeln!(out, "AI Suggestion")?;
        writeln!(out, "{}", self.suggestion)?;
        writeln!(out)?;
        writeln!(out, "Pro Tips")?;
        bullets(out, &AI_PRO_TIPS)
    }
}

// ── Pages without results ──

impl Render for HomePage {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        for feature in &self.features {
            writeln!(out, "{} ({})", feature.title, feature.route)?;
            writeln!(out, "  {}", feature.description)?;
        }
        writeln!(out)?;
        writeln!(out, "Sample prompts (loanwise ai --sample N)")?;
        for (i, prompt) in self.sample_prompts.iter().enumerate() {
            writeln!(out, "  {}. {prompt}", i + 1)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

/// An input route opened directly: what the form asks for.
#[derive(Debug, Clone, Serialize)]
pub struct FormPage {
    pub route: Route,
    pub pipeline: Pipeline,
    pub usage: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FormField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sample_prompts: Vec<&'static str>,
}

impl FormPage {
    pub fn for_pipeline(pipeline: Pipeline) -> Self {
        let mut page = Self {
            route: pipeline.input_route(),
            pipeline,
            usage: String::new(),
            fields: Vec::new(),
            tips: Vec::new(),
            sample_prompts: Vec::new(),
        };
        match pipeline {
            Pipeline::Pan => page.usage = "loanwise pan <FILE>".into(),
            Pipeline::Aadhaar => page.usage = "loanwise aadhaar <FILE>".into(),
            Pipeline::Loan => {
                page.usage = "loanwise loan --<field> <value>...".into();
                page.fields = LoanField::ALL
                    .into_iter()
                    .map(|field| FormField {
                        name: field.wire_name(),
                        label: field.label(),
                        required: field.is_required(),
                    })
                    .collect();
            }
            Pipeline::Ai => {
                page.usage = "loanwise ai <PROMPT> | loanwise ai --sample N".into();
                page.tips = AI_USAGE_TIPS.to_vec();
                page.sample_prompts = SAMPLE_PROMPTS.to_vec();
            }
        }
        page
    }
}

impl Render for FormPage {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Usage: {}", self.usage)?;
        if !self.fields.is_empty() {
            writeln!(out)?;
            for field in &self.fields {
                let mark = if field.required { " *" } else { "" };
                writeln!(out, "  --{}  {}{mark}", field.name.replace('_', "-"), field.label)?;
            }
        }
        if !self.sample_prompts.is_empty() {
            writeln!(out)?;
            writeln!(out, "Sample prompts")?;
            for (i, prompt) in self.sample_prompts.iter().enumerate() {
                writeln!(out, "  {}. {prompt}", i + 1)?;
            }
        }
        if !self.tips.is_empty() {
            writeln!(out)?;
            writeln!(out, "Tips")?;
            bullets(out, &self.tips)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotFoundPage {
    pub path: String,
    pub message: &'static str,
    pub back_route: Route,
}

impl NotFoundPage {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: "Oops! Page not found",
            back_route: Route::Home,
        }
    }
}

impl Render for NotFoundPage {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "404: {}", self.path)?;
        writeln!(out, "{}", self.message)?;
        writeln!(out, "Return to Home ({})", self.back_route)
    }
}
