//! Manifest loading error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ManifestError {
    #[error("manifest not found: {path}")]
    NotFound { path: String },

    #[error("line {line}: bad line: {content:?}")]
    Format { line: usize, content: String },

    #[error("line {line}: duplicate entry for {path}")]
    DuplicateEntry { line: usize, path: String },

    #[error("failed to read manifest {path}: {message}")]
    Unreadable { path: String, message: String },
}

impl ManifestError {
    /// Line number (1-based) the error points at, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Format { line, .. } | Self::DuplicateEntry { line, .. } => Some(*line),
            Self::NotFound { .. } | Self::Unreadable { .. } => None,
        }
    }

    /// Whether the manifest was readable but its contents are invalid.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::DuplicateEntry { .. })
    }
}

impl UserFacingError for ManifestError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => {
                Some("Place the checksum manifest in the root directory or pass --manifest.")
            }
            Self::Format { .. } => Some("Each line must read `<hex-digest> <relative-path>`."),
            Self::DuplicateEntry { .. } => Some("List every path only once in the manifest."),
            Self::Unreadable { .. } => Some("Check the manifest file permissions."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "manifest.not_found",
            Self::Format { .. } => "manifest.format",
            Self::DuplicateEntry { .. } => "manifest.duplicate_entry",
            Self::Unreadable { .. } => "manifest.unreadable",
        };
        Some(code)
    }
}
