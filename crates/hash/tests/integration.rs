//! Integration tests for hash crate

#[cfg(test)]
mod tests {
    use sigcheck_hash::*;
    use sigcheck_platform::LocalFs;
    use tempfile::tempdir;
    use tokio::fs;

    #[tokio::test]
    async fn test_hash_large_file_in_chunks() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("large.bin");

        // Several chunks plus a partial tail
        let data = vec![0x5au8; DEFAULT_CHUNK_SIZE * 3 + 123];
        fs::write(&file_path, &data).await.unwrap();

        for algorithm in DigestAlgorithm::ALL {
            let hasher = FileHasher::new(algorithm, DEFAULT_CHUNK_SIZE);
            let digest = hasher.hash_file(&LocalFs::new(), &file_path).await.unwrap();
            assert_eq!(digest, Digest::from_data(algorithm, &data), "{algorithm}");
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = FileHasher::default()
            .hash_file(&LocalFs::new(), &dir.path().join("missing.txt"))
            .await;
        assert!(matches!(
            result,
            Err(sigcheck_errors::Error::Io {
                kind: std::io::ErrorKind::NotFound,
                ..
            })
        ));
    }
}
