//! In-memory [`FileSource`] for exercising the verifier without touching disk

use super::{BoxedReader, FileSource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, ReadBuf};

#[derive(Debug, Clone)]
enum MemoryEntry {
    Contents(Vec<u8>),
    OpenFails(io::ErrorKind),
    ReadFails(io::ErrorKind),
}

/// A fixed tree of files held in memory.
///
/// Files can be made to fail on open or on the first read to simulate
/// permission problems and I/O errors. Every call to `open` is counted.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: HashMap<PathBuf, MemoryEntry>,
    open_delay: Option<Duration>,
    opens: AtomicUsize,
}

impl MemoryFs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a readable file
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.files
            .insert(path.into(), MemoryEntry::Contents(contents.into()));
        self
    }

    /// Add a file that exists but cannot be opened
    #[must_use]
    pub fn with_unopenable_file(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.files.insert(path.into(), MemoryEntry::OpenFails(kind));
        self
    }

    /// Add a file that opens but fails on the first read
    #[must_use]
    pub fn with_unreadable_file(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.files.insert(path.into(), MemoryEntry::ReadFails(kind));
        self
    }

    /// Sleep for `delay` inside every `open` call
    #[must_use]
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    /// Number of `open` calls made so far
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileSource for MemoryFs {
    async fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    async fn open(&self, path: &Path) -> io::Result<BoxedReader> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.open_delay {
            tokio::time::sleep(delay).await;
        }

        match self.files.get(path) {
            Some(MemoryEntry::Contents(bytes)) => Ok(Box::new(io::Cursor::new(bytes.clone()))),
            Some(MemoryEntry::OpenFails(kind)) => Err(io::Error::new(
                *kind,
                format!("simulated open failure: {}", path.display()),
            )),
            Some(MemoryEntry::ReadFails(kind)) => Ok(Box::new(FailingReader { kind: *kind })),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )),
        }
    }
}

struct FailingReader {
    kind: io::ErrorKind,
}

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(self.kind, "simulated read failure")))
    }
}
