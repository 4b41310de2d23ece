//! Transient user notifications (toasts).
//!
//! Controllers only emit; how a notice is shown is up to the sink.

use std::io::{self, Write};
use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Failure shown in the destructive style.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

/// Side-effect sink for notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to stderr as `<title>: <message>`.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(kind = ?notice.kind, message = %notice.message, "Notice");
        if let Err(e) = write_notice(&mut io::stderr().lock(), &notice) {
            tracing::warn!(error = %e, message = %notice.message, "Cannot write notice to stderr");
        }
    }
}

fn write_notice(out: &mut dyn Write, notice: &Notice) -> io::Result<()> {
    writeln!(out, "{}: {}", notice.title, notice.message)?;
    out.flush()
}

/// Keeps every notice in memory. Used by tests and by callers that render
/// notices themselves.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
