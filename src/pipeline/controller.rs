//! Generic form-submission controller.
//!
//! Each pipeline is a `Workflow`: how to turn its form into a request, which
//! transport call to make, and how the results route renders what it is
//! handed. `WorkflowController` runs the shared sequence for any of them:
//!
//! 1. refuse if a submission is already in flight (no notice, no call);
//! 2. validate, notifying and stopping on failure;
//! 3. raise the submission guard and make exactly one transport call;
//! 4. on success navigate to the results route with a transfer object,
//!    on failure notify and return to idle.
//!
//! The guard is released by drop, so a transport that panics cannot leave
//! the form stuck in the submitting state.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use super::guard::{ActiveSubmission, SubmissionGuard};
use super::interpret::{
    render_aadhaar, render_ai, render_loan, render_pan, DocumentView, LoanView, Rendered,
};
use super::transport::{Transport, TransportError};
use super::types::{AiExchange, DocumentForm, LoanApplicationForm, VerificationRequest};
use super::validation::{validate_document, validate_loan, validate_prompt, ValidationError};
use super::Pipeline;
use crate::navigation::{Navigator, Route, Transfer, TransferObject};
use crate::notify::{Notice, Notifier};

// ═══════════════════════════════════════════════════════════
// Workflow definitions
// ═══════════════════════════════════════════════════════════

/// The pipeline-specific parts of a submission.
pub trait Workflow {
    /// What the user edits.
    type Input;
    /// What the transport is called with. Only reachable through `prepare`,
    /// so an unvalidated form can never be sent.
    type Request;
    /// What the results route shows.
    type View;

    const PIPELINE: Pipeline;

    fn prepare(input: &Self::Input) -> Result<Self::Request, ValidationError>;

    /// Make the single transport call and package the outcome together
    /// with its submission context.
    fn call(transport: &dyn Transport, request: &Self::Request)
        -> Result<TransferObject, TransportError>;

    fn render(state: Option<TransferObject>) -> Rendered<Self::View>;
}

pub struct PanWorkflow;

impl Workflow for PanWorkflow {
    type Input = DocumentForm;
    type Request = VerificationRequest;
    type View = DocumentView;

    const PIPELINE: Pipeline = Pipeline::Pan;

    fn prepare(input: &DocumentForm) -> Result<VerificationRequest, ValidationError> {
        validate_document(input).cloned()
    }

    fn call(
        transport: &dyn Transport,
        request: &VerificationRequest,
    ) -> Result<TransferObject, TransportError> {
        let result = transport.extract_pan(request)?;
        Ok(TransferObject::Pan(Transfer {
            result,
            context: request.file_name.clone(),
        }))
    }

    fn render(state: Option<TransferObject>) -> Rendered<DocumentView> {
        render_pan(state)
    }
}

pub struct AadhaarWorkflow;

impl Workflow for AadhaarWorkflow {
    type Input = DocumentForm;
    type Request = VerificationRequest;
    type View = DocumentView;

    const PIPELINE: Pipeline = Pipeline::Aadhaar;

    fn prepare(input: &DocumentForm) -> Result<VerificationRequest, ValidationError> {
        validate_document(input).cloned()
    }

    fn call(
        transport: &dyn Transport,
        request: &VerificationRequest,
    ) -> Result<TransferObject, TransportError> {
        let result = transport.extract_aadhaar(request)?;
        Ok(TransferObject::Aadhaar(Transfer {
            result,
            context: request.file_name.clone(),
        }))
    }

    fn render(state: Option<TransferObject>) -> Rendered<DocumentView> {
        render_aadhaar(state)
    }
}

pub struct LoanWorkflow;

impl Workflow for LoanWorkflow {
    type Input = LoanApplicationForm;
    type Request = LoanApplicationForm;
    type View = LoanView;

    const PIPELINE: Pipeline = Pipeline::Loan;

    fn prepare(input: &LoanApplicationForm) -> Result<LoanApplicationForm, ValidationError> {
        validate_loan(input)?;
        Ok(input.clone())
    }

    fn call(
        transport: &dyn Transport,
        form: &LoanApplicationForm,
    ) -> Result<TransferObject, TransportError> {
        let result = transport.process_loan(form)?;
        Ok(TransferObject::Loan(Transfer {
            result,
            context: form.clone(),
        }))
    }

    fn render(state: Option<TransferObject>) -> Rendered<LoanView> {
        render_loan(state)
    }
}

pub struct AiWorkflow;

impl Workflow for AiWorkflow {
    type Input = String;
    type Request = String;
    type View = AiExchange;

    const PIPELINE: Pipeline = Pipeline::Ai;

    /// Blank prompts are refused, but a prompt that passes is sent exactly as
    /// typed, surrounding whitespace included.
    fn prepare(input: &String) -> Result<String, ValidationError> {
        validate_prompt(input)?;
        Ok(input.clone())
    }

    fn call(transport: &dyn Transport, prompt: &String) -> Result<TransferObject, TransportError> {
        let result = transport.suggest(prompt)?;
        Ok(TransferObject::Ai(Transfer {
            result,
            context: prompt.clone(),
        }))
    }

    fn render(state: Option<TransferObject>) -> Rendered<AiExchange> {
        render_ai(state)
    }
}

pub type PanController = WorkflowController<PanWorkflow>;
pub type AadhaarController = WorkflowController<AadhaarWorkflow>;
pub type LoanController = WorkflowController<LoanWorkflow>;
pub type AiController = WorkflowController<AiWorkflow>;

// ═══════════════════════════════════════════════════════════
// Controller
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Submitting,
    /// Terminal: this form instance handed its result to the results route.
    Navigated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The call succeeded and the results route now holds the transfer.
    Navigated(Route),
    /// Validation failed; nothing was sent.
    Invalid(ValidationError),
    /// The call failed; carries the message the user was shown.
    Failed(String),
    /// Ignored: a submission from this form is still in flight.
    InFlight,
    /// Ignored: this form already navigated away.
    Finished,
}

/// One form instance of a pipeline.
///
/// Controllers are independent: two controllers, even for the same pipeline,
/// never block each other.
pub struct WorkflowController<W: Workflow> {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<Navigator>,
    guard: SubmissionGuard,
    navigated: AtomicBool,
    _workflow: PhantomData<fn() -> W>,
}

impl<W: Workflow> WorkflowController<W> {
    pub fn new(
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<Navigator>,
    ) -> Self {
        Self {
            transport,
            notifier,
            navigator,
            guard: SubmissionGuard::new(),
            navigated: AtomicBool::new(false),
            _workflow: PhantomData,
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        W::PIPELINE
    }

    pub fn state(&self) -> WorkflowState {
        if self.navigated.load(Ordering::Acquire) {
            WorkflowState::Navigated
        } else if self.guard.is_in_flight() {
            WorkflowState::Submitting
        } else {
            WorkflowState::Idle
        }
    }

    /// Whether the submit control is live.
    pub fn can_submit(&self) -> bool {
        self.state() == WorkflowState::Idle
    }

    /// The submission currently in flight, if any.
    pub fn current_submission(&self) -> Option<ActiveSubmission> {
        self.guard.current_submission()
    }

    pub fn submit(&self, input: &W::Input) -> SubmitOutcome {
        let pipeline = W::PIPELINE;

        if self.navigated.load(Ordering::Acquire) {
            tracing::debug!(%pipeline, "Submit ignored: form already navigated");
            return SubmitOutcome::Finished;
        }
        if self.guard.is_in_flight() {
            tracing::debug!(%pipeline, "Submit ignored: submission in flight");
            return SubmitOutcome::InFlight;
        }

        let request = match W::prepare(input) {
            Ok(request) => request,
            Err(e) => {
                tracing::info!(%pipeline, reason = %e, "Validation failed");
                self.notifier.notify(Notice::error(e.to_string()));
                return SubmitOutcome::Invalid(e);
            }
        };

        let outcome = {
            // Lost the race to a concurrent submit between the check above
            // and here.
            let Some(in_flight) = self.guard.try_acquire(pipeline) else {
                return SubmitOutcome::InFlight;
            };
            let span = tracing::info_span!(
                "submission",
                %pipeline,
                id = %in_flight.submission().id,
            );
            let _enter = span.enter();
            tracing::info!("Submitting");

            let outcome = W::call(self.transport.as_ref(), &request);
            // Mark terminal before the flag drops so no resubmit slips in.
            if outcome.is_ok() {
                self.navigated.store(true, Ordering::Release);
            }
            outcome
        };

        match outcome {
            Ok(transfer) => {
                let route = pipeline.results_route();
                self.navigator.navigate(route, Some(transfer));
                tracing::info!(%pipeline, %route, "Submission succeeded");
                SubmitOutcome::Navigated(route)
            }
            Err(e) => {
                let message = e.user_message(pipeline);
                tracing::warn!(%pipeline, error = %e, "Submission failed");
                self.notifier.notify(Notice::error(message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }
}

/// Enter a workflow's results route: consume whatever transfer object the
/// navigator holds and render it.
pub fn render_results<W: Workflow>(navigator: &Navigator) -> Rendered<W::View> {
    W::render(navigator.take_transfer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::pipeline::interpret::{EmptyState, Tone};
    use crate::pipeline::{
        GroqSuggestion, LoanDecision, LoanField, MlPrediction, MockTransport, RuleBasedAssessment,
        Suggestion, VerificationResult,
    };
    use std::sync::atomic::AtomicUsize;
    use std::sync::{mpsc, Mutex};
    use std::thread;

    struct Harness {
        transport: Arc<MockTransport>,
        notifier: Arc<RecordingNotifier>,
        navigator: Arc<Navigator>,
    }

    impl Harness {
        fn new(transport: MockTransport) -> Self {
            Self {
                transport: Arc::new(transport),
                notifier: Arc::new(RecordingNotifier::new()),
                navigator: Arc::new(Navigator::at(Route::Home)),
            }
        }

        fn controller<W: Workflow>(&self) -> WorkflowController<W> {
            WorkflowController::new(
                self.transport.clone(),
                self.notifier.clone(),
                self.navigator.clone(),
            )
        }

        fn messages(&self) -> Vec<String> {
            self.notifier.notices().into_iter().map(|n| n.message).collect()
        }
    }

    fn pan_file() -> DocumentForm {
        let mut form = DocumentForm::new();
        form.select(VerificationRequest::new("pan.png", vec![0x89, b'P', b'N', b'G']));
        form
    }

    fn loan_form() -> LoanApplicationForm {
        LoanApplicationForm::new()
            .with(LoanField::NoOfDependents, "2")
            .with(LoanField::IncomeAnnum, "500000")
            .with(LoanField::LoanAmount, "1000000")
            .with(LoanField::LoanTerm, "240")
            .with(LoanField::CibilScore, "750")
            .with(LoanField::SelfEmployed, "No")
    }

    fn rejected_decision() -> LoanDecision {
        LoanDecision {
            final_decision: "REJECTED".into(),
            rule_based: RuleBasedAssessment {
                approved: false,
                rules_passed: 2,
                total_rules: 5,
                rule_score: 40.0,
            },
            ml_prediction: MlPrediction {
                prediction: "REJECTED".into(),
                confidence: 0.87,
            },
            groq_suggestion: GroqSuggestion {
                suggestion: "Lower the requested amount.".into(),
            },
            verification_score: 62.0,
        }
    }

    fn rejected(message: Option<&str>) -> TransportError {
        TransportError::Rejected {
            status: 400,
            message: message.map(str::to_string),
        }
    }

    // ── Validation gate ──

    #[test]
    fn invalid_input_never_reaches_transport() {
        let h = Harness::new(MockTransport::unreachable());

        let outcome = h.controller::<PanWorkflow>().submit(&DocumentForm::new());
        assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::NoFileSelected));

        let outcome = h.controller::<AadhaarWorkflow>().submit(&DocumentForm::new());
        assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::NoFileSelected));

        let incomplete = loan_form().with(LoanField::CibilScore, "");
        let outcome = h.controller::<LoanWorkflow>().submit(&incomplete);
        assert_eq!(
            outcome,
            SubmitOutcome::Invalid(ValidationError::MissingRequiredFields(vec![
                LoanField::CibilScore
            ]))
        );

        let outcome = h.controller::<AiWorkflow>().submit(&"   \n".to_string());
        assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::EmptyPrompt));

        assert_eq!(h.transport.call_count(), 0);
        assert_eq!(h.navigator.current(), Route::Home);
        assert_eq!(
            h.messages(),
            vec![
                "Please select a file to upload",
                "Please select a file to upload",
                "Please fill in all required fields",
                "Please enter a prompt",
            ]
        );
    }

    #[test]
    fn invalid_submit_leaves_form_idle() {
        let h = Harness::new(MockTransport::unreachable());
        let controller = h.controller::<AiWorkflow>();
        controller.submit(&String::new());
        assert_eq!(controller.state(), WorkflowState::Idle);
        assert!(controller.can_submit());
    }

    // ── Scenarios ──

    #[test]
    fn pan_success_navigates_with_result() {
        let h = Harness::new(MockTransport::unreachable().with_pan(Ok(VerificationResult {
            valid: true,
            extracted_number: Some("ABCDE1234F".into()),
            extracted_text: Some("INCOME TAX DEPARTMENT".into()),
        })));
        let controller = h.controller::<PanWorkflow>();

        let outcome = controller.submit(&pan_file());
        assert_eq!(outcome, SubmitOutcome::Navigated(Route::PanResults));
        assert_eq!(h.navigator.current(), Route::PanResults);
        assert_eq!(controller.state(), WorkflowState::Navigated);
        assert!(h.messages().is_empty());

        let view = render_results::<PanWorkflow>(&h.navigator).ready().unwrap();
        assert_eq!(view.number.as_deref(), Some("ABCDE1234F"));
        assert_eq!(view.validity.label, "Valid PAN Format");
        assert_eq!(view.file_name, "pan.png");
    }

    #[test]
    fn aadhaar_rejection_shows_service_message() {
        let h = Harness::new(
            MockTransport::unreachable().with_aadhaar(Err(rejected(Some("Unsupported image")))),
        );
        let controller = h.controller::<AadhaarWorkflow>();

        let mut form = DocumentForm::new();
        form.select(VerificationRequest::new("aadhaar.jpg", vec![1, 2, 3]));
        let outcome = controller.submit(&form);

        assert_eq!(outcome, SubmitOutcome::Failed("Unsupported image".into()));
        assert_eq!(h.messages(), vec!["Unsupported image"]);
        assert_eq!(h.navigator.current(), Route::Home);
        assert_eq!(controller.state(), WorkflowState::Idle);
    }

    #[test]
    fn loan_rejected_decision_renders() {
        let h = Harness::new(MockTransport::unreachable().with_loan(Ok(rejected_decision())));
        let controller = h.controller::<LoanWorkflow>();

        assert_eq!(
            controller.submit(&loan_form()),
            SubmitOutcome::Navigated(Route::LoanResults)
        );

        let view = render_results::<LoanWorkflow>(&h.navigator).ready().unwrap();
        assert_eq!(view.decision.tone, Tone::Negative);
        assert_eq!(view.decision.label, "REJECTED");
        assert_eq!(view.rule_based.rules, "2/5");
        assert_eq!(view.rule_based.score, "40/100");
        assert_eq!(view.ml_prediction.confidence.label, "87.0%");
        assert_eq!(view.summary.loan_amount, "$1,000,000");
    }

    #[test]
    fn ai_unreachable_shows_connect_message() {
        let h = Harness::new(MockTransport::unreachable());
        let controller = h.controller::<AiWorkflow>();

        let outcome = controller.submit(&"How can I improve my CIBIL score?".to_string());
        assert_eq!(outcome, SubmitOutcome::Failed("Failed to connect to server".into()));
        assert_eq!(h.messages(), vec!["Failed to connect to server"]);
        assert_eq!(h.navigator.current(), Route::Home);
        assert_eq!(controller.state(), WorkflowState::Idle);
    }

    #[test]
    fn results_route_without_state_is_empty() {
        let navigator = Navigator::new();
        navigator.open("/loan-results");
        let rendered = render_results::<LoanWorkflow>(&navigator);
        assert_eq!(rendered, Rendered::Empty(EmptyState::for_pipeline(Pipeline::Loan)));
    }

    #[test]
    fn rejection_without_message_uses_pipeline_default() {
        let h = Harness::new(
            MockTransport::unreachable()
                .with_pan(Err(rejected(None)))
                .with_aadhaar(Err(rejected(Some(""))))
                .with_loan(Err(rejected(None)))
                .with_suggestion(Err(rejected(None))),
        );

        h.controller::<PanWorkflow>().submit(&pan_file());
        h.controller::<AadhaarWorkflow>().submit(&pan_file());
        h.controller::<LoanWorkflow>().submit(&loan_form());
        h.controller::<AiWorkflow>().submit(&"hi".to_string());

        assert_eq!(
            h.messages(),
            vec![
                "Failed to process PAN card",
                "Failed to process Aadhaar card",
                "Failed to process loan application",
                "Failed to get AI suggestions",
            ]
        );
        assert_eq!(h.transport.call_count(), 4);
    }

    #[test]
    fn transfer_consumed_on_first_render() {
        let h = Harness::new(MockTransport::unreachable().with_suggestion(Ok(Suggestion {
            suggestion: "Pay on time.".into(),
        })));
        h.controller::<AiWorkflow>().submit(&"  tips?  ".to_string());

        let exchange = render_results::<AiWorkflow>(&h.navigator).ready().unwrap();
        assert_eq!(exchange.prompt, "  tips?  ");
        assert!(render_results::<AiWorkflow>(&h.navigator).is_empty());
    }

    // ── Submission guard ──

    #[test]
    fn guard_resets_after_every_outcome() {
        let cases: Vec<(MockTransport, WorkflowState)> = vec![
            (
                MockTransport::unreachable().with_loan(Ok(rejected_decision())),
                WorkflowState::Navigated,
            ),
            (
                MockTransport::unreachable().with_loan(Err(rejected(Some("bad")))),
                WorkflowState::Idle,
            ),
            (MockTransport::unreachable(), WorkflowState::Idle),
        ];

        for (transport, expected) in cases {
            let h = Harness::new(transport);
            let controller = h.controller::<LoanWorkflow>();
            controller.submit(&loan_form());
            assert_eq!(controller.state(), expected);
            assert!(controller.current_submission().is_none());
        }
    }

    #[test]
    fn failed_submit_can_be_retried() {
        let h = Harness::new(MockTransport::unreachable());
        let controller = h.controller::<AiWorkflow>();
        controller.submit(&"first".to_string());
        controller.submit(&"second".to_string());
        assert_eq!(h.transport.call_count(), 2);
    }

    #[test]
    fn navigated_form_ignores_further_submits() {
        let h = Harness::new(MockTransport::unreachable().with_loan(Ok(rejected_decision())));
        let controller = h.controller::<LoanWorkflow>();
        controller.submit(&loan_form());

        assert_eq!(controller.submit(&loan_form()), SubmitOutcome::Finished);
        assert_eq!(h.transport.call_count(), 1);
        assert!(!controller.can_submit());
    }

    /// Blocks inside `suggest` until the test releases it.
    struct GatedTransport {
        calls: AtomicUsize,
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl Transport for GatedTransport {
        fn extract_pan(&self, _: &VerificationRequest) -> Result<VerificationResult, TransportError> {
            unreachable!("only suggest is gated")
        }

        fn extract_aadhaar(
            &self,
            _: &VerificationRequest,
        ) -> Result<VerificationResult, TransportError> {
            unreachable!("only suggest is gated")
        }

        fn process_loan(&self, _: &LoanApplicationForm) -> Result<LoanDecision, TransportError> {
            unreachable!("only suggest is gated")
        }

        fn suggest(&self, _: &str) -> Result<Suggestion, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            Ok(Suggestion {
                suggestion: "ok".into(),
            })
        }
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let transport = Arc::new(GatedTransport {
            calls: AtomicUsize::new(0),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        });
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(Navigator::new());
        let controller = Arc::new(AiController::new(
            transport.clone(),
            notifier.clone(),
            navigator.clone(),
        ));

        let first = {
            let controller = Arc::clone(&controller);
            thread::spawn(move || controller.submit(&"first".to_string()))
        };
        entered_rx.recv().unwrap();

        assert_eq!(controller.state(), WorkflowState::Submitting);
        assert!(!controller.can_submit());
        assert_eq!(
            controller.current_submission().map(|s| s.pipeline),
            Some(Pipeline::Ai)
        );
        assert_eq!(controller.submit(&"second".to_string()), SubmitOutcome::InFlight);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        // Other pipelines are not blocked.
        let loan = Harness::new(MockTransport::unreachable().with_loan(Ok(rejected_decision())));
        assert_eq!(
            loan.controller::<LoanWorkflow>().submit(&loan_form()),
            SubmitOutcome::Navigated(Route::LoanResults)
        );

        release_tx.send(()).unwrap();
        assert_eq!(first.join().unwrap(), SubmitOutcome::Navigated(Route::AiResults));
        assert_eq!(controller.state(), WorkflowState::Navigated);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(notifier.notices().is_empty());
    }

    struct PanickingTransport;

    impl Transport for PanickingTransport {
        fn extract_pan(&self, _: &VerificationRequest) -> Result<VerificationResult, TransportError> {
            panic!("transport blew up")
        }

        fn extract_aadhaar(
            &self,
            _: &VerificationRequest,
        ) -> Result<VerificationResult, TransportError> {
            panic!("transport blew up")
        }

        fn process_loan(&self, _: &LoanApplicationForm) -> Result<LoanDecision, TransportError> {
            panic!("transport blew up")
        }

        fn suggest(&self, _: &str) -> Result<Suggestion, TransportError> {
            panic!("transport blew up")
        }
    }

    #[test]
    fn panicking_transport_releases_guard() {
        let controller = PanController::new(
            Arc::new(PanickingTransport),
            Arc::new(RecordingNotifier::new()),
            Arc::new(Navigator::new()),
        );

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            controller.submit(&pan_file())
        }));
        assert!(result.is_err());
        assert_eq!(controller.state(), WorkflowState::Idle);
    }
}
