//! Verifier facade: load the manifest, run the pool, aggregate

use crate::emit::RunEvents;
use crate::pool::{VerifyOptions, VerifyPool};
use crate::report::VerificationReport;
use sigcheck_config::{calculate_concurrency, validate_manifest_filename, Config};
use sigcheck_errors::{ConfigError, Error};
use sigcheck_events::{EventEmitter, EventSender, VerifyEvent};
use sigcheck_hash::DigestAlgorithm;
use sigcheck_manifest::Manifest;
use sigcheck_platform::{FileSource, LocalFs};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Checks directory trees against their checksum manifest.
///
/// Holds its options and file source; cloning shares the source.
#[derive(Clone)]
pub struct Verifier {
    source: Arc<dyn FileSource>,
    options: VerifyOptions,
    tx: Option<EventSender>,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("options", &self.options)
            .field("events", &self.tx.is_some())
            .finish_non_exhaustive()
    }
}

impl Verifier {
    /// Create a verifier reading the local filesystem
    ///
    /// # Errors
    ///
    /// Same as [`VerifierBuilder::build`].
    pub fn new(config: &Config) -> Result<Self, Error> {
        VerifierBuilder::new().with_config(config).build()
    }

    #[must_use]
    pub fn builder() -> VerifierBuilder {
        VerifierBuilder::new()
    }

    #[must_use]
    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Verify `root_dir` and return the report whatever the outcomes
    ///
    /// # Errors
    ///
    /// Returns `Error::Manifest` if the manifest is missing or malformed (no
    /// file is checked in that case) and `Error::Timeout` if the deadline
    /// expired before every entry was attempted.
    #[instrument(level = "debug", skip_all, fields(root = %root_dir.display()))]
    pub async fn verify(&self, root_dir: &Path) -> Result<VerificationReport, Error> {
        let started = Instant::now();
        let deadline = self.options.timeout.map(|t| started + t);
        let events = RunEvents::new(self.tx.clone(), Uuid::new_v4().to_string());

        let manifest_path = root_dir.join(&self.options.manifest_filename);
        let manifest =
            match Manifest::load(self.source.as_ref(), &manifest_path, self.options.algorithm)
                .await
            {
                Ok(manifest) => manifest,
                Err(e) => {
                    events.emit_verify(VerifyEvent::ManifestRejected {
                        manifest: manifest_path.display().to_string(),
                        message: e.to_string(),
                    });
                    return Err(e);
                }
            };

        let total = manifest.len();
        let pool = VerifyPool::new(Arc::clone(&self.source), &self.options);
        events.emit_verify(VerifyEvent::Started {
            root: root_dir.display().to_string(),
            manifest: manifest_path.display().to_string(),
            entries: total,
            concurrency: pool.worker_count(total),
        });

        let run = pool
            .with_deadline(deadline)
            .with_events(events.clone())
            .run(root_dir, manifest.into_entries())
            .await;

        if run.timed_out {
            let attempted = run.attempted_paths();
            events.emit_verify(VerifyEvent::TimedOut {
                attempted: attempted.len(),
                total,
            });
            return Err(Error::Timeout { attempted, total });
        }

        let report = VerificationReport::aggregate(run.outcomes);
        let counts = report.counts();
        let duration = started.elapsed();
        info!(
            total = counts.total,
            matched = counts.matched,
            failed = counts.failed(),
            elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "verification finished"
        );
        events.emit_verify(VerifyEvent::Completed {
            total: counts.total,
            matched: counts.matched,
            failed: counts.failed(),
            duration,
        });

        Ok(report)
    }

    /// Verify `root_dir`, failing unless every entry matched
    ///
    /// # Errors
    ///
    /// Everything [`Verifier::verify`] returns, plus `Error::Signature` with
    /// the rendered failure list when any entry did not match.
    pub async fn check(&self, root_dir: &Path) -> Result<VerificationReport, Error> {
        self.verify(root_dir).await?.into_result()
    }
}

/// Verify `root_dir` with default settings on the local filesystem
///
/// # Errors
///
/// See [`Verifier::check`].
pub async fn check(root_dir: impl AsRef<Path>) -> Result<(), Error> {
    Verifier::builder()
        .build()?
        .check(root_dir.as_ref())
        .await
        .map(|_| ())
}

/// Builder for [`Verifier`]
pub struct VerifierBuilder {
    source: Option<Arc<dyn FileSource>>,
    options: VerifyOptions,
    explicit_manifest: bool,
    tx: Option<EventSender>,
}

impl VerifierBuilder {
    /// Create a new builder with default options
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            options: VerifyOptions::default(),
            explicit_manifest: false,
            tx: None,
        }
    }

    /// Take every option from a loaded configuration
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.options = VerifyOptions::from_config(config);
        self.explicit_manifest = config.verify.manifest_filename.is_some();
        self
    }

    /// Read files through `source` instead of the local filesystem
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn FileSource>) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_manifest_filename(mut self, name: impl Into<String>) -> Self {
        self.options.manifest_filename = name.into();
        self.explicit_manifest = true;
        self
    }

    /// Set the digest algorithm
    ///
    /// Unless a manifest name was set explicitly, the name follows the
    /// algorithm (`sha256sum.txt` for SHA-256).
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.options.algorithm = algorithm;
        if !self.explicit_manifest {
            self.options.manifest_filename = algorithm.default_manifest_name();
        }
        self
    }

    /// Set the worker count (0 = host parallelism)
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.options.concurrency = calculate_concurrency(concurrency);
        self
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.options.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Build the verifier
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a manifest file name that is
    /// not a plain file name and for a zero chunk size.
    pub fn build(self) -> Result<Verifier, Error> {
        validate_manifest_filename(&self.options.manifest_filename)?;
        if self.options.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chunk_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        debug!(options = ?self.options, "built verifier");
        Ok(Verifier {
            source: self.source.unwrap_or_else(|| Arc::new(LocalFs::new())),
            options: self.options,
            tx: self.tx,
        })
    }
}

impl Default for VerifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
