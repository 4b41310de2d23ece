//! Shared application state.
//!
//! `CoreState` holds the three collaborators every workflow needs: the
//! transport to the backing service, the notice sink and the navigator.
//! Each form instance gets its own controller, built from these on demand,
//! so pipelines never share a submission guard.

use std::sync::Arc;

use crate::navigation::Navigator;
use crate::notify::{ConsoleNotifier, Notifier};
use crate::pipeline::http::HttpTransport;
use crate::pipeline::{Transport, TransportError, Workflow, WorkflowController};

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<Navigator>,
}

impl CoreState {
    /// State wired to the deployment's service endpoint, reporting notices
    /// on the console.
    pub fn new() -> Result<Self, TransportError> {
        let transport = HttpTransport::deployment()?;
        tracing::info!(endpoint = transport.base_url(), "Transport ready");
        Ok(Self::with_transport(
            Arc::new(transport),
            Arc::new(ConsoleNotifier),
        ))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            navigator: Arc::new(Navigator::new()),
        }
    }

    /// A fresh form instance for workflow `W`.
    pub fn controller<W: Workflow>(&self) -> WorkflowController<W> {
        WorkflowController::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.notifier),
            Arc::clone(&self.navigator),
        )
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }
}
