//! Per-pipeline in-flight flag.
//!
//! Each form instance owns one `SubmissionGuard`. `try_acquire()` raises the
//! flag and hands back an RAII token; dropping the token (normal return,
//! early `?`, or unwinding) lowers it again. While the flag is up the submit
//! action is inert: a second acquisition on the same guard returns `None`.
//!
//! Guards are never shared between pipelines, so submissions on different
//! pipelines do not contend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::Serialize;
use uuid::Uuid;

use super::Pipeline;

/// Snapshot of the submission currently in flight.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSubmission {
    pub id: Uuid,
    pub pipeline: Pipeline,
    /// When the submission started (ISO 8601).
    pub started_at: String,
}

pub struct SubmissionGuard {
    in_flight: AtomicBool,
    current: Mutex<Option<ActiveSubmission>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            current: Mutex::new(None),
        }
    }

    /// Raise the in-flight flag without blocking.
    ///
    /// Returns `None` if a submission is already in flight.
    pub fn try_acquire(&self, pipeline: Pipeline) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        let submission = ActiveSubmission {
            id: Uuid::new_v4(),
            pipeline,
            started_at: chrono::Utc::now().to_rfc3339(),
        };
        if let Ok(mut current) = self.current.lock() {
            *current = Some(submission.clone());
        }

        Some(InFlight {
            guard: self,
            submission,
        })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// What is in flight right now, if anything.
    pub fn current_submission(&self) -> Option<ActiveSubmission> {
        self.current.lock().ok()?.clone()
    }

    fn release(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
        self.in_flight.store(false, Ordering::Release);
    }
}

impl Default for SubmissionGuard {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// InFlight: RAII submission token
// ═══════════════════════════════════════════════════════════

/// Held for the whole transport call. Dropping it lowers the flag.
pub struct InFlight<'a> {
    guard: &'a SubmissionGuard,
    submission: ActiveSubmission,
}

impl InFlight<'_> {
    pub fn submission(&self) -> &ActiveSubmission {
        &self.submission
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard.release();
    }
}
