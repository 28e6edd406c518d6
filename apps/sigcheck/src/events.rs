//! Event handling and per-file progress lines

use crate::logging::log_event_with_tracing;
use sigcheck_events::{AppEvent, EventMessage, FileStatus, VerifyEvent};

/// Consumes events emitted by the verifier
pub struct EventHandler {
    verbose: bool,
}

impl EventHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: &EventMessage) {
        log_event_with_tracing(message);

        if !self.verbose {
            return;
        }
        match &message.event {
            AppEvent::Verify(VerifyEvent::Started {
                root,
                entries,
                concurrency,
                ..
            }) => {
                eprintln!("checking {entries} files under {root} ({concurrency} workers)");
            }
            AppEvent::Verify(VerifyEvent::FileVerified {
                path,
                status,
                detail,
            }) => {
                eprintln!("{}", file_line(path, *status, detail.as_deref()));
            }
            _ => {}
        }
    }
}

/// One progress line for a checked file
fn file_line(path: &str, status: FileStatus, detail: Option<&str>) -> String {
    let label = match status {
        FileStatus::Match => "OK",
        FileStatus::Mismatch => "MISMATCH",
        FileStatus::ReadError => "ERROR",
        FileStatus::NotFound => "MISSING",
    };
    match detail {
        Some(detail) if !status.is_ok() => format!("{label:<8} {path}: {detail}"),
        _ => format!("{label:<8} {path}"),
    }
}
