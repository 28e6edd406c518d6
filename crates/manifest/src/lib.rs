#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Checksum manifest handling for sigcheck
//!
//! A manifest lists one `<hex-digest><whitespace><relative-path>` record per
//! line, the layout written by `sha1sum` and friends. Parsing is all or
//! nothing: the first malformed line fails the whole load.

use serde::Serialize;
use sigcheck_errors::{Error, ManifestError};
use sigcheck_hash::DigestAlgorithm;
use sigcheck_platform::FileSource;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single manifest record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ManifestEntry {
    /// Forward-slash path relative to the verified root
    pub relative_path: String,
    /// Lowercase hex digest the file is expected to have
    pub expected_digest: String,
}

impl ManifestEntry {
    /// Resolve the entry against `root`, one path component at a time so the
    /// host separator is used.
    #[must_use]
    pub fn resolve(&self, root: &Path) -> PathBuf {
        self.relative_path
            .split('/')
            .fold(root.to_path_buf(), |path, part| path.join(part))
    }
}

/// Parsed checksum manifest (entries in file order)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    algorithm: DigestAlgorithm,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse manifest text written with `algorithm`
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Format` for the first line that is not blank
    /// and not a valid record, and `ManifestError::DuplicateEntry` when a path
    /// is listed twice.
    pub fn parse(text: &str, algorithm: DigestAlgorithm) -> Result<Self, ManifestError> {
        let mut entries = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            if raw.trim().is_empty() {
                continue;
            }

            let entry = parse_line(raw, algorithm).ok_or_else(|| ManifestError::Format {
                line,
                content: raw.to_string(),
            })?;

            if seen.insert(entry.relative_path.clone(), line).is_some() {
                return Err(ManifestError::DuplicateEntry {
                    line,
                    path: entry.relative_path,
                });
            }
            entries.push(entry);
        }

        Ok(Self { algorithm, entries })
    }

    /// Load and parse the manifest at `path`
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::NotFound` if there is no file at `path`,
    /// `ManifestError::Unreadable` if it cannot be read as text, and the
    /// errors of [`Manifest::parse`] otherwise.
    pub async fn load(
        source: &dyn FileSource,
        path: &Path,
        algorithm: DigestAlgorithm,
    ) -> Result<Self, Error> {
        let text = source.read_to_string(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ManifestError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                ManifestError::Unreadable {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let manifest = Self::parse(&text, algorithm)?;
        debug!(
            manifest = %path.display(),
            entries = manifest.len(),
            algorithm = %algorithm,
            "loaded manifest"
        );
        Ok(manifest)
    }

    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<ManifestEntry> {
        self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse one non-blank line; `None` means malformed
fn parse_line(raw: &str, algorithm: DigestAlgorithm) -> Option<ManifestEntry> {
    let (digest, path) = raw.trim().split_once(char::is_whitespace)?;
    if !algorithm.is_valid_hex(digest) {
        return None;
    }

    // `sha1sum -b` marks binary-mode entries with a leading '*'
    let path = path.trim_start();
    let path = path.strip_prefix('*').unwrap_or(path);

    Some(ManifestEntry {
        relative_path: normalize_path(path)?,
        expected_digest: digest.to_ascii_lowercase(),
    })
}

/// Collapse `.` and empty segments; reject absolute paths and `..`
fn normalize_path(path: &str) -> Option<String> {
    if path.starts_with('/') {
        return None;
    }

    let mut parts = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => return None,
            part => parts.push(part),
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
