#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for sigcheck
//!
//! This crate provides the error taxonomy shared by every sigcheck crate.
//! Manifest and configuration problems are kept apart from integrity
//! violations so callers can branch on the kind instead of the message.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod manifest;
pub mod signature;

// Re-export all error types at the root
pub use config::ConfigError;
pub use manifest::ManifestError;
pub use signature::SignatureError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("{0}")]
    Signature(#[from] SignatureError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("verification timed out after {} of {total} entries", .attempted.len())]
    Timeout {
        /// Relative paths of the entries that were verified before the deadline.
        attempted: Vec<String>,
        total: usize,
    },

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }

    /// Whether this error is a usage/configuration problem rather than an
    /// integrity violation.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Manifest(_) | Self::Config(_))
    }

    /// Whether this error reports files that failed verification.
    #[must_use]
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::Signature(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Manifest(err) => err.user_message(),
            Error::Signature(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Io { message, .. } => Cow::Owned(message.clone()),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Manifest(err) => err.user_hint(),
            Error::Signature(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::Timeout { .. } => {
                Some("Raise the timeout or lower the number of files checked per run.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::Io { .. } => true,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Manifest(err) => err.user_code(),
            Error::Signature(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Timeout { .. } => Some("verify.timeout"),
            Error::Io { .. } => Some("error.io"),
        }
    }
}
