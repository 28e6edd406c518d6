//! Per-file outcomes and the aggregated verification report

use serde::Serialize;
use sigcheck_errors::{Error, SignatureError};
use sigcheck_events::FileStatus;
use sigcheck_manifest::ManifestEntry;
use std::fmt::Write as _;

/// Result of checking one manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// Computed digest equals the expected one
    Match,
    /// File was read but its digest differs
    Mismatch { expected: String, actual: String },
    /// File exists but could not be opened or read
    ReadError { cause: String },
    /// No file at the resolved path
    NotFound,
}

impl VerificationOutcome {
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    /// Outcome classification without the payload
    #[must_use]
    pub fn status(&self) -> FileStatus {
        match self {
            Self::Match => FileStatus::Match,
            Self::Mismatch { .. } => FileStatus::Mismatch,
            Self::ReadError { .. } => FileStatus::ReadError,
            Self::NotFound => FileStatus::NotFound,
        }
    }

    /// One-line reason for a failed outcome, `None` for a match
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Match => None,
            Self::Mismatch { expected, actual } => {
                Some(format!("mismatch (expected {expected}, actual {actual})"))
            }
            Self::ReadError { cause } => Some(format!("read error: {cause}")),
            Self::NotFound => Some("file not found".to_string()),
        }
    }
}

/// An entry paired with its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryResult {
    pub entry: ManifestEntry,
    pub outcome: VerificationOutcome,
}

/// Number of outcomes of each kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub total: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub read_errors: usize,
    pub not_found: usize,
}

impl OutcomeCounts {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total - self.matched
    }

    fn record(&mut self, outcome: &VerificationOutcome) {
        self.total += 1;
        match outcome {
            VerificationOutcome::Match => self.matched += 1,
            VerificationOutcome::Mismatch { .. } => self.mismatched += 1,
            VerificationOutcome::ReadError { .. } => self.read_errors += 1,
            VerificationOutcome::NotFound => self.not_found += 1,
        }
    }
}

/// Outcomes of one verification run, ordered by relative path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    all_matched: bool,
    counts: OutcomeCounts,
    results: Vec<EntryResult>,
}

impl VerificationReport {
    /// Build a report from outcomes in any order
    #[must_use]
    pub fn aggregate<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (ManifestEntry, VerificationOutcome)>,
    {
        let mut results: Vec<EntryResult> = outcomes
            .into_iter()
            .map(|(entry, outcome)| EntryResult { entry, outcome })
            .collect();
        results.sort_by(|a, b| a.entry.relative_path.cmp(&b.entry.relative_path));

        let mut counts = OutcomeCounts::default();
        for result in &results {
            counts.record(&result.outcome);
        }

        Self {
            all_matched: counts.matched == counts.total,
            counts,
            results,
        }
    }

    /// True when every entry matched (vacuously true for an empty manifest)
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.all_matched
    }

    #[must_use]
    pub fn counts(&self) -> OutcomeCounts {
        self.counts
    }

    #[must_use]
    pub fn results(&self) -> &[EntryResult] {
        &self.results
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate over the entries that did not match
    pub fn failures(&self) -> impl Iterator<Item = &EntryResult> {
        self.results.iter().filter(|r| !r.outcome.is_match())
    }

    /// Outcome recorded for `relative_path`
    #[must_use]
    pub fn outcome_for(&self, relative_path: &str) -> Option<&VerificationOutcome> {
        self.results
            .binary_search_by(|r| r.entry.relative_path.as_str().cmp(relative_path))
            .ok()
            .map(|i| &self.results[i].outcome)
    }

    /// One line per failing file, matching files omitted
    #[must_use]
    pub fn render_failures(&self) -> String {
        let mut out = String::new();
        for result in self.failures() {
            if let Some(reason) = result.outcome.failure_reason() {
                if !out.is_empty() {
                    out.push('\n');
                }
                let _ = write!(out, "  {}: {reason}", result.entry.relative_path);
            }
        }
        out
    }

    /// Convert a report with failures into `Error::Signature`
    ///
    /// # Errors
    ///
    /// Returns `Error::Signature` carrying the rendered failure list when any
    /// entry did not match.
    pub fn into_result(self) -> Result<Self, Error> {
        if self.all_matched {
            Ok(self)
        } else {
            Err(SignatureError::new(
                self.counts.failed(),
                self.counts.total,
                self.render_failures(),
            )
            .into())
        }
    }
}
