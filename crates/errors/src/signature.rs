//! Integrity violation error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Raised when at least one manifest entry did not verify.
///
/// `report` holds the rendered multi-line failure listing, one failing path
/// per line with its expected and actual state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("signature verification failed for {failed} of {total} files:\n{report}")]
pub struct SignatureError {
    pub failed: usize,
    pub total: usize,
    pub report: String,
}

impl SignatureError {
    #[must_use]
    pub fn new(failed: usize, total: usize, report: impl Into<String>) -> Self {
        Self {
            failed,
            total,
            report: report.into(),
        }
    }
}

impl UserFacingError for SignatureError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some("Restore the listed files from a trusted source, then re-run the check.")
    }

    fn user_code(&self) -> Option<&'static str> {
        Some("verify.signature_mismatch")
    }
}
