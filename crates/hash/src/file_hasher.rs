//! File-level hashing operations
//!
//! Files are streamed through the accumulator in fixed-size chunks so memory
//! use stays bounded by the chunk size regardless of file size.

use crate::{Digest, DigestAlgorithm, DEFAULT_CHUNK_SIZE};
use sigcheck_errors::Error;
use sigcheck_platform::FileSource;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Computes digests of single files with a fixed algorithm and chunk size
#[derive(Debug, Clone, Copy)]
pub struct FileHasher {
    algorithm: DigestAlgorithm,
    chunk_size: usize,
}

impl Default for FileHasher {
    fn default() -> Self {
        Self::new(DigestAlgorithm::default(), DEFAULT_CHUNK_SIZE)
    }
}

impl FileHasher {
    /// Create a file hasher; a zero chunk size is raised to one byte
    #[must_use]
    pub fn new(algorithm: DigestAlgorithm, chunk_size: usize) -> Self {
        Self {
            algorithm,
            chunk_size: chunk_size.max(1),
        }
    }

    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Compute the digest of everything `reader` yields
    ///
    /// # Errors
    /// Returns an error if a read fails mid-stream.
    pub async fn hash_reader<R>(&self, mut reader: R) -> Result<Digest, std::io::Error>
    where
        R: AsyncRead + Unpin,
    {
        let mut hasher = self.algorithm.hasher();
        let mut buffer = vec![0; self.chunk_size];

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(Digest::from_bytes(self.algorithm, hasher.finalize()))
    }

    /// Compute the digest of the file at `path`
    ///
    /// # Errors
    /// Returns an I/O error carrying `path` if the file cannot be opened or a
    /// read fails.
    pub async fn hash_file(&self, source: &dyn FileSource, path: &Path) -> Result<Digest, Error> {
        let reader = source
            .open(path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;

        self.hash_reader(reader)
            .await
            .map_err(|e| Error::io_with_path(&e, path))
    }
}
