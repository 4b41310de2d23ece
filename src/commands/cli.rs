//! Command-line surface: one subcommand per page.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::home::SAMPLE_PROMPTS;
use crate::pipeline::{LoanApplicationForm, LoanField, SelfEmployed};

use super::output::Format;

#[derive(Parser, Debug)]
#[command(
    name = "loanwise",
    version,
    about = "Verify identity documents, decide loan applications and ask for credit advice",
    after_help = "EXAMPLES:\n  \
                  loanwise pan ./pan.png\n  \
                  loanwise --json aadhaar ./aadhaar.jpg\n  \
                  loanwise loan --no-of-dependents 2 --income-annum 500000 --loan-amount 1000000 \\\n    \
                  --loan-term 240 --cibil-score 750 --self-employed no\n  \
                  loanwise ai --sample 1\n  \
                  loanwise open /loan-results"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print pages as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else {
            Format::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the feature catalogue and sample prompts
    Home,

    /// Extract and verify a PAN card image
    Pan {
        /// Image of the card (png, jpg, jpeg)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Extract and verify an Aadhaar card image
    Aadhaar {
        /// Image of the card (png, jpg, jpeg)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Submit a loan application for a decision
    Loan(LoanArgs),

    /// Ask for a financial suggestion
    Ai(AiArgs),

    /// Go straight to a page by path, without any results attached
    Open {
        #[arg(value_name = "PATH")]
        path: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Employment {
    Yes,
    No,
}

impl From<Employment> for SelfEmployed {
    fn from(value: Employment) -> Self {
        match value {
            Employment::Yes => SelfEmployed::Yes,
            Employment::No => SelfEmployed::No,
        }
    }
}

/// Loan fields are taken as typed. Omitted fields stay blank, so missing
/// required fields are reported by form validation, not by the parser.
#[derive(Args, Debug, Default)]
pub struct LoanArgs {
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub no_of_dependents: Option<String>,

    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    pub income_annum: Option<String>,

    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    pub loan_amount: Option<String>,

    /// Term in months
    #[arg(long, value_name = "MONTHS", allow_hyphen_values = true)]
    pub loan_term: Option<String>,

    #[arg(long, value_name = "SCORE", allow_hyphen_values = true)]
    pub cibil_score: Option<String>,

    #[arg(long, value_enum)]
    pub self_employed: Option<Employment>,

    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    pub residential_assets_value: Option<String>,

    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    pub commercial_assets_value: Option<String>,

    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    pub luxury_assets_value: Option<String>,

    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    pub bank_asset_value: Option<String>,
}

impl LoanArgs {
    pub fn to_form(&self) -> LoanApplicationForm {
        let mut form = LoanApplicationForm::new();
        let typed = [
            (LoanField::NoOfDependents, &self.no_of_dependents),
            (LoanField::IncomeAnnum, &self.income_annum),
            (LoanField::LoanAmount, &self.loan_amount),
            (LoanField::LoanTerm, &self.loan_term),
            (LoanField::CibilScore, &self.cibil_score),
            (LoanField::ResidentialAssetsValue, &self.residential_assets_value),
            (LoanField::CommercialAssetsValue, &self.commercial_assets_value),
            (LoanField::LuxuryAssetsValue, &self.luxury_assets_value),
            (LoanField::BankAssetValue, &self.bank_asset_value),
        ];
        for (field, value) in typed {
            if let Some(value) = value {
                form.set(field, value.as_str());
            }
        }
        if let Some(employment) = self.self_employed {
            form.set(
                LoanField::SelfEmployed,
                SelfEmployed::from(employment).wire_value(),
            );
        }
        form
    }
}

#[derive(Args, Debug, Default)]
pub struct AiArgs {
    /// Question to ask; sent exactly as given
    #[arg(value_name = "PROMPT", conflicts_with = "sample")]
    pub prompt: Option<String>,

    /// Use one of the sample prompts instead (1-5, see `loanwise home`)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=SAMPLE_PROMPTS.len() as i64))]
    pub sample: Option<u8>,
}
