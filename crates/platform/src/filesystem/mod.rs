//! Read-only filesystem operations used during verification

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Owned async reader handed out by a [`FileSource`].
pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// Trait for the read-only filesystem access the verifier needs
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Check if a path exists
    async fn exists(&self, path: &Path) -> bool;

    /// Open a file for streaming reads
    async fn open(&self, path: &Path) -> io::Result<BoxedReader>;

    /// Read a whole (small) file into a string
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let mut reader = self.open(path).await?;
        let mut contents = String::new();
        reader.read_to_string(&mut contents).await?;
        Ok(contents)
    }
}

/// [`FileSource`] backed by the local disk through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSource for LocalFs {
    async fn exists(&self, path: &Path) -> bool {
        // An error (e.g. permission denied on a parent) is not proof of
        // absence; let the subsequent open report the real cause.
        !matches!(tokio::fs::try_exists(path).await, Ok(false))
    }

    async fn open(&self, path: &Path) -> io::Result<BoxedReader> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_exists_and_open() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("present.txt");
        tokio::fs::write(&file_path, b"local contents").await.unwrap();

        let fs = LocalFs::new();
        assert!(fs.exists(&file_path).await);
        assert!(!fs.exists(&temp_dir.path().join("absent.txt")).await);

        let contents = fs.read_to_string(&file_path).await.unwrap();
        assert_eq!(contents, "local contents");
    }

    #[tokio::test]
    async fn test_local_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = match LocalFs::new().open(&temp_dir.path().join("nope")).await {
            Ok(_) => panic!("opening a missing file should fail"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
