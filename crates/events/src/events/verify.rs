use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Classification of one verified file, as carried by events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Match,
    Mismatch,
    ReadError,
    NotFound,
}

impl FileStatus {
    #[must_use]
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Match)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Match => "ok",
            Self::Mismatch => "mismatch",
            Self::ReadError => "read error",
            Self::NotFound => "not found",
        }
    }
}

/// Verification run lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerifyEvent {
    /// Manifest loaded, workers about to start
    Started {
        root: String,
        manifest: String,
        entries: usize,
        concurrency: usize,
    },

    /// One manifest entry finished
    FileVerified {
        path: String,
        status: FileStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },

    /// Every entry was attempted
    Completed {
        total: usize,
        matched: usize,
        failed: usize,
        duration: Duration,
    },

    /// The deadline expired before every entry was attempted
    TimedOut { attempted: usize, total: usize },

    /// The manifest could not be loaded; no file was checked
    ManifestRejected { manifest: String, message: String },
}
