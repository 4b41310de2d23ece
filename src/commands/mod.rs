//! Command handlers: each subcommand drives one page.
//!
//! A pipeline command fills a fresh form, submits it through the form's
//! controller and, when the controller navigated, renders the results route
//! from the transfer object it was handed. Notices (validation and service
//! failures) are reported by the controller's notifier, not here.

pub mod cli;
pub mod output;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;
use thiserror::Error;

use crate::config;
use crate::core_state::CoreState;
use crate::home::{home_page, sample_prompt};
use crate::navigation::Route;
use crate::pipeline::{
    render_results, AadhaarWorkflow, AiWorkflow, DocumentForm, LoanWorkflow, PanWorkflow, Pipeline,
    SubmitOutcome, VerificationRequest, Workflow,
};

use cli::{AiArgs, Command};
use output::{emit, Format, FormPage, NotFoundPage, Render};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot render page: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

/// How a command ended, as far as the user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A page was shown.
    Shown,
    /// Validation or the service refused; a notice was shown instead.
    Refused,
    /// The requested page does not exist.
    NotFound,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Shown => ExitCode::SUCCESS,
            Status::Refused | Status::NotFound => ExitCode::FAILURE,
        }
    }
}

pub fn execute(
    command: Command,
    format: Format,
    state: &CoreState,
    out: &mut dyn Write,
) -> Result<Status, CommandError> {
    match command {
        Command::Home => open(Route::Home.path(), format, state, out),
        Command::Pan { file } => {
            let form = document_form(file.as_deref())?;
            submit::<PanWorkflow>(&form, format, state, out)
        }
        Command::Aadhaar { file } => {
            let form = document_form(file.as_deref())?;
            submit::<AadhaarWorkflow>(&form, format, state, out)
        }
        Command::Loan(args) => submit::<LoanWorkflow>(&args.to_form(), format, state, out),
        Command::Ai(args) => submit::<AiWorkflow>(&prompt(&args), format, state, out),
        Command::Open { path } => open(&path, format, state, out),
    }
}

/// A document form with the file at `path` selected, or nothing selected.
fn document_form(path: Option<&Path>) -> Result<DocumentForm, CommandError> {
    let mut form = DocumentForm::new();
    if let Some(path) = path {
        let request = VerificationRequest::from_path(path).map_err(|source| CommandError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if request.mime_hint.is_none() {
            tracing::warn!(
                file = %request.file_name,
                content_type = %request.content_type(),
                "Not a png/jpg image; sending anyway"
            );
        }
        form.select(request);
    }
    Ok(form)
}

/// Choosing a sample replaces the prompt text.
fn prompt(args: &AiArgs) -> String {
    match args.sample.and_then(|n| sample_prompt(usize::from(n))) {
        Some(sample) => sample.to_string(),
        None => args.prompt.clone().unwrap_or_default(),
    }
}

fn submit<W>(
    input: &W::Input,
    format: Format,
    state: &CoreState,
    out: &mut dyn Write,
) -> Result<Status, CommandError>
where
    W: Workflow,
    W::View: Serialize + Render,
{
    let controller = state.controller::<W>();
    match controller.submit(input) {
        SubmitOutcome::Navigated(route) => {
            let page = render_results::<W>(state.navigator());
            emit(out, format, route.title(), &page)?;
            Ok(Status::Shown)
        }
        outcome => {
            tracing::debug!(pipeline = %W::PIPELINE, ?outcome, "Nothing to show");
            Ok(Status::Refused)
        }
    }
}

/// Direct navigation. Nothing is attached, so results routes show their
/// empty state.
fn open(
    path: &str,
    format: Format,
    state: &CoreState,
    out: &mut dyn Write,
) -> Result<Status, CommandError> {
    let navigator = state.navigator();
    let route = navigator.open(path);
    let title = route.title();

    match route {
        Route::Home => emit(out, format, config::APP_NAME, &home_page())?,
        Route::NotFound => {
            tracing::warn!(path, "No such page");
            emit(out, format, title, &NotFoundPage::new(path))?;
            return Ok(Status::NotFound);
        }
        results if results.is_results() => match results.pipeline() {
            Some(Pipeline::Pan) => {
                emit(out, format, title, &render_results::<PanWorkflow>(navigator))?
            }
            Some(Pipeline::Aadhaar) => {
                emit(out, format, title, &render_results::<AadhaarWorkflow>(navigator))?
            }
            Some(Pipeline::Loan) => {
                emit(out, format, title, &render_results::<LoanWorkflow>(navigator))?
            }
            Some(Pipeline::Ai) => emit(out, format, title, &render_results::<AiWorkflow>(navigator))?,
            None => emit(out, format, title, &NotFoundPage::new(path))?,
        },
        input => match input.pipeline() {
            Some(pipeline) => emit(out, format, title, &FormPage::for_pipeline(pipeline))?,
            None => emit(out, format, title, &NotFoundPage::new(path))?,
        },
    }
    Ok(Status::Shown)
}
