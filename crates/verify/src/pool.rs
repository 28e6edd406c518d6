//! Bounded worker pool that checks manifest entries in parallel
//!
//! Every entry is queued up front. `concurrency` workers pull from the shared
//! queue until it is empty (or the deadline has passed) and push one outcome
//! per entry into a channel. Nothing fails fast: a bad file only produces a
//! failing outcome.

use crate::emit::RunEvents;
use crate::report::VerificationOutcome;
use sigcheck_config::{calculate_concurrency, Config};
use sigcheck_errors::UserFacingError;
use sigcheck_events::{EventEmitter, VerifyEvent};
use sigcheck_hash::{DigestAlgorithm, FileHasher, DEFAULT_CHUNK_SIZE};
use sigcheck_manifest::ManifestEntry;
use sigcheck_platform::FileSource;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Runtime options for a verification run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Manifest file name under the root directory
    pub manifest_filename: String,
    pub algorithm: DigestAlgorithm,
    /// Worker count, already resolved (never zero)
    pub concurrency: usize,
    pub chunk_size: usize,
    /// Time allowed for a whole run
    pub timeout: Option<Duration>,
}

impl VerifyOptions {
    /// Resolve configuration into runtime options
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let verify = &config.verify;
        Self {
            manifest_filename: verify.manifest_filename(),
            algorithm: verify.algorithm,
            concurrency: verify.concurrency(),
            chunk_size: verify.chunk_size,
            timeout: verify.timeout(),
        }
    }
}

impl Default for VerifyOptions {
    fn default() -> Self {
        let algorithm = DigestAlgorithm::default();
        Self {
            manifest_filename: algorithm.default_manifest_name(),
            algorithm,
            concurrency: calculate_concurrency(0),
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: None,
        }
    }
}

/// A manifest entry with its path resolved against the root directory
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub entry: ManifestEntry,
    pub path: PathBuf,
}

impl WorkItem {
    #[must_use]
    pub fn new(entry: ManifestEntry, root_dir: &Path) -> Self {
        let path = entry.resolve(root_dir);
        Self { entry, path }
    }
}

/// Outcomes gathered by one pool run, in completion order
#[derive(Debug, Clone)]
pub struct PoolRun {
    pub outcomes: Vec<(ManifestEntry, VerificationOutcome)>,
    /// Number of entries queued
    pub total: usize,
    /// Deadline expired before every entry was attempted
    pub timed_out: bool,
}

impl PoolRun {
    /// Relative paths of the entries that produced an outcome, sorted
    #[must_use]
    pub fn attempted_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .outcomes
            .iter()
            .map(|(entry, _)| entry.relative_path.clone())
            .collect();
        paths.sort();
        paths
    }
}

/// Worker pool bound to one file source and hashing configuration
#[derive(Clone)]
pub struct VerifyPool {
    source: Arc<dyn FileSource>,
    hasher: FileHasher,
    concurrency: usize,
    deadline: Option<Instant>,
    events: RunEvents,
}

impl std::fmt::Debug for VerifyPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyPool")
            .field("hasher", &self.hasher)
            .field("concurrency", &self.concurrency)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl VerifyPool {
    #[must_use]
    pub fn new(source: Arc<dyn FileSource>, options: &VerifyOptions) -> Self {
        Self {
            source,
            hasher: FileHasher::new(options.algorithm, options.chunk_size),
            concurrency: options.concurrency.max(1),
            deadline: None,
            events: RunEvents::default(),
        }
    }

    /// Stop handing out work once `deadline` has passed
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    #[must_use]
    pub(crate) fn with_events(mut self, events: RunEvents) -> Self {
        self.events = events;
        self
    }

    /// Number of workers a run over `total` entries starts
    #[must_use]
    pub fn worker_count(&self, total: usize) -> usize {
        self.concurrency.min(total).max(1)
    }

    /// Check every entry under `root_dir`
    ///
    /// Returns once all workers have stopped. Outcomes arrive in completion
    /// order; each queued entry yields at most one outcome, and exactly one
    /// unless the deadline expired.
    pub async fn run(&self, root_dir: &Path, entries: Vec<ManifestEntry>) -> PoolRun {
        let total = entries.len();
        let queue: VecDeque<WorkItem> = entries
            .into_iter()
            .map(|entry| WorkItem::new(entry, root_dir))
            .collect();
        let queue = Arc::new(Mutex::new(queue));
        let workers = self.worker_count(total);

        debug!(
            root = %root_dir.display(),
            entries = total,
            workers,
            algorithm = %self.hasher.algorithm(),
            "starting verification workers"
        );

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = JoinSet::new();
        for worker_id in 0..workers {
            tasks.spawn(worker(
                worker_id,
                Arc::clone(&queue),
                Arc::clone(&self.source),
                self.hasher,
                self.deadline,
                tx.clone(),
            ));
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(total);
        while let Some((entry, outcome)) = rx.recv().await {
            trace!(path = %entry.relative_path, status = outcome.status().as_str(), "entry checked");
            self.events.emit_verify(VerifyEvent::FileVerified {
                path: entry.relative_path.clone(),
                status: outcome.status(),
                detail: outcome.failure_reason(),
            });
            outcomes.push((entry, outcome));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "verification worker exited abnormally");
            }
        }

        let timed_out = outcomes.len() < total;
        if timed_out {
            warn!(
                attempted = outcomes.len(),
                total, "deadline expired before all entries were checked"
            );
        }

        PoolRun {
            outcomes,
            total,
            timed_out,
        }
    }
}

/// Check `entries` under `root_dir` with a fresh pool
///
/// The deadline, if any, starts counting when this is called.
pub async fn verify_all(
    source: Arc<dyn FileSource>,
    root_dir: &Path,
    entries: Vec<ManifestEntry>,
    options: &VerifyOptions,
) -> PoolRun {
    let deadline = options.timeout.map(|t| Instant::now() + t);
    VerifyPool::new(source, options)
        .with_deadline(deadline)
        .run(root_dir, entries)
        .await
}

async fn worker(
    worker_id: usize,
    queue: Arc<Mutex<VecDeque<WorkItem>>>,
    source: Arc<dyn FileSource>,
    hasher: FileHasher,
    deadline: Option<Instant>,
    results: mpsc::UnboundedSender<(ManifestEntry, VerificationOutcome)>,
) {
    let mut processed = 0usize;
    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        let Some(item) = queue.lock().await.pop_front() else {
            break;
        };

        let entry = item.entry.clone();
        let source = Arc::clone(&source);
        // a panic while checking one file must still yield an outcome
        let outcome =
            match tokio::spawn(async move { verify_item(source.as_ref(), hasher, &item).await })
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(worker_id, path = %entry.relative_path, error = %e, "entry check panicked");
                    VerificationOutcome::ReadError {
                        cause: join_error_cause(e),
                    }
                }
            };

        processed += 1;
        if results.send((entry, outcome)).is_err() {
            break;
        }
    }
    trace!(worker_id, processed, "worker finished");
}

/// Check a single item against its expected digest
pub async fn verify_item(
    source: &dyn FileSource,
    hasher: FileHasher,
    item: &WorkItem,
) -> VerificationOutcome {
    if !source.exists(&item.path).await {
        return VerificationOutcome::NotFound;
    }

    match hasher.hash_file(source, &item.path).await {
        Ok(digest) if digest.matches_hex(&item.entry.expected_digest) => VerificationOutcome::Match,
        Ok(digest) => VerificationOutcome::Mismatch {
            expected: item.entry.expected_digest.clone(),
            actual: digest.to_hex(),
        },
        Err(e) => VerificationOutcome::ReadError {
            cause: e.user_message().into_owned(),
        },
    }
}

fn join_error_cause(err: JoinError) -> String {
    if !err.is_panic() {
        return format!("check was cancelled: {err}");
    }
    let payload = err.into_panic();
    let reason = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("check panicked: {reason}")
}
