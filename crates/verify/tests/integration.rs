//! Integration tests for verify

#[cfg(test)]
mod tests {
    use sigcheck_errors::{Error, ManifestError};
    use sigcheck_hash::{Digest, DigestAlgorithm};
    use sigcheck_platform::MemoryFs;
    use sigcheck_verify::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::fs;

    fn sha1_hex(data: &[u8]) -> String {
        Digest::from_data(DigestAlgorithm::Sha1, data).to_hex()
    }

    /// Write `files` under a fresh directory plus a sha1sum.txt listing them
    async fn make_tree(files: &[(&str, &[u8])]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let mut manifest = String::new();
        for (path, contents) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).await.unwrap();
            }
            fs::write(&full, contents).await.unwrap();
            manifest.push_str(&format!("{}  {path}\n", sha1_hex(contents)));
        }
        fs::write(dir.path().join("sha1sum.txt"), manifest)
            .await
            .unwrap();
        dir
    }

    fn verifier(concurrency: usize) -> Verifier {
        Verifier::builder()
            .with_concurrency(concurrency)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_all_files_match() {
        let dir = make_tree(&[
            ("a.txt", &b"alpha"[..]),
            ("nested/b.bin", &[0u8, 1, 2, 3][..]),
            ("nested/deeper/c.txt", &b""[..]),
        ])
        .await;

        let report = verifier(4).check(dir.path()).await.unwrap();
        assert!(report.all_matched());
        assert_eq!(report.len(), 3);
        assert_eq!(report.counts().matched, 3);

        check(dir.path()).await.unwrap();
    }

    #[tokio::test]
    async fn test_altered_file_is_reported_alone() {
        let dir = make_tree(&[
            ("one.txt", &b"1"[..]),
            ("two.txt", &b"2"[..]),
            ("three.txt", &b"3"[..]),
        ])
        .await;
        fs::write(dir.path().join("two.txt"), b"tampered")
            .await
            .unwrap();

        let err = verifier(2).check(dir.path()).await.unwrap_err();
        let Error::Signature(sig) = &err else {
            panic!("expected signature error, got {err:?}");
        };
        assert_eq!(sig.failed, 1);
        assert_eq!(sig.total, 3);
        assert!(sig.report.contains("two.txt"));
        assert!(sig.report.contains(&sha1_hex(b"2")));
        assert!(sig.report.contains(&sha1_hex(b"tampered")));
        assert!(!sig.report.contains("one.txt"));
        assert!(!sig.report.contains("three.txt"));

        let report = verifier(2).verify(dir.path()).await.unwrap();
        assert_eq!(
            report.outcome_for("two.txt"),
            Some(&VerificationOutcome::Mismatch {
                expected: sha1_hex(b"2"),
                actual: sha1_hex(b"tampered"),
            })
        );
        assert_eq!(report.counts().matched, 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = make_tree(&[("keep.txt", &b"k"[..]), ("drop.txt", &b"d"[..])]).await;
        fs::remove_file(dir.path().join("drop.txt")).await.unwrap();

        let report = verifier(2).verify(dir.path()).await.unwrap();
        assert_eq!(
            report.outcome_for("drop.txt"),
            Some(&VerificationOutcome::NotFound)
        );
        assert_eq!(report.counts().read_errors, 0);

        let err = verifier(2).check(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("drop.txt: file not found"));
    }

    #[tokio::test]
    async fn test_file1_file2_scenario() {
        let dir = TempDir::new().unwrap();
        let file1 = b"first file contents";
        let file2 = b"second file contents";
        fs::write(dir.path().join("file1.txt"), file1).await.unwrap();
        fs::write(dir.path().join("file2.txt"), file2).await.unwrap();
        let bogus = "b".repeat(40);
        fs::write(
            dir.path().join("sha1sum.txt"),
            format!("{}  file1.txt\n{bogus}  file2.txt\n", sha1_hex(file1)),
        )
        .await
        .unwrap();

        let err = check(dir.path()).await.unwrap_err();
        assert!(err.is_integrity_violation());
        let message = err.to_string();
        assert!(message.contains("file2.txt"));
        assert!(message.contains(&bogus));
        assert!(message.contains(&sha1_hex(file2)));
        assert!(!message.contains("file1.txt"));
    }

    #[tokio::test]
    async fn test_runs_are_idempotent() {
        let dir = make_tree(&[("x", &b"x"[..]), ("y", &b"y"[..]), ("z", &b"z"[..])]).await;
        fs::write(dir.path().join("y"), b"changed").await.unwrap();

        let first = verifier(3).verify(dir.path()).await.unwrap();
        let second = verifier(3).verify(dir.path()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrency_does_not_change_outcomes() {
        let owned: Vec<(String, Vec<u8>)> = (0..24)
            .map(|i| {
                let contents = vec![u8::try_from(i).unwrap(); i * 100];
                (format!("dir{}/file{i}.dat", i % 3), contents)
            })
            .collect();
        let files: Vec<(&str, &[u8])> = owned
            .iter()
            .map(|(p, c)| (p.as_str(), c.as_slice()))
            .collect();
        let dir = make_tree(&files).await;
        fs::write(dir.path().join("dir1/file4.dat"), b"corrupt")
            .await
            .unwrap();
        fs::remove_file(dir.path().join("dir2/file5.dat"))
            .await
            .unwrap();

        let baseline = verifier(1).verify(dir.path()).await.unwrap();
        assert_eq!(baseline.len(), 24);
        assert_eq!(baseline.counts().failed(), 2);

        for concurrency in 2..=8 {
            let report = verifier(concurrency).verify(dir.path()).await.unwrap();
            assert_eq!(report, baseline, "concurrency {concurrency}");
        }
    }

    #[tokio::test]
    async fn test_malformed_manifest_reads_no_files() {
        let fs = Arc::new(
            MemoryFs::new()
                .with_file(
                    "/root/sha1sum.txt",
                    format!("{}  a.txt\nbadline\n", sha1_hex(b"a")).into_bytes(),
                )
                .with_file("/root/a.txt", b"a".to_vec()),
        );
        let verifier = Verifier::builder()
            .with_source(fs.clone())
            .build()
            .unwrap();

        let err = verifier.check(Path::new("/root")).await.unwrap_err();
        assert!(err.is_config_error());
        match err {
            Error::Manifest(ManifestError::Format { line, content }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "badline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // only the manifest itself was opened
        assert_eq!(fs.open_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let err = verifier(1).check(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::Manifest(ManifestError::NotFound { .. })));
        assert!(err.is_config_error());
        assert!(!err.is_integrity_violation());
    }

    #[tokio::test]
    async fn test_empty_manifest_passes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sha1sum.txt"), "\n\n").await.unwrap();

        let report = verifier(1).check(dir.path()).await.unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_other_algorithm_and_manifest_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data"), b"payload").await.unwrap();
        let digest = Digest::from_data(DigestAlgorithm::Sha256, b"payload").to_hex();
        fs::write(dir.path().join("SHA256SUMS"), format!("{digest} *data\n"))
            .await
            .unwrap();

        let verifier = Verifier::builder()
            .with_algorithm(DigestAlgorithm::Sha256)
            .with_manifest_filename("SHA256SUMS")
            .with_chunk_size(3)
            .build()
            .unwrap();
        let report = verifier.check(dir.path()).await.unwrap();
        assert!(report.all_matched());
    }

    #[tokio::test]
    async fn test_deadline_returns_timeout_with_attempted_entries() {
        let mut memory = MemoryFs::new().with_file(
            "/slow/sha1sum.txt",
            (0..5)
                .map(|i| format!("{}  f{i}\n", sha1_hex(format!("{i}").as_bytes())))
                .collect::<String>()
                .into_bytes(),
        );
        for i in 0..5 {
            memory = memory.with_file(format!("/slow/f{i}"), format!("{i}").into_bytes());
        }
        let verifier = Verifier::builder()
            .with_source(Arc::new(memory.with_open_delay(Duration::from_millis(150))))
            .with_concurrency(1)
            .with_timeout(Some(Duration::from_millis(400)))
            .build()
            .unwrap();

        let err = verifier.check(Path::new("/slow")).await.unwrap_err();
        let Error::Timeout { attempted, total } = err else {
            panic!("expected timeout, got {err:?}");
        };
        assert_eq!(total, 5);
        assert!(!attempted.is_empty());
        assert!(attempted.len() < 5);
    }

    #[tokio::test]
    async fn test_verifier_is_reusable_across_roots() {
        let good = make_tree(&[("a", &b"a"[..])]).await;
        let bad = make_tree(&[("a", &b"a"[..])]).await;
        fs::write(bad.path().join("a"), b"b").await.unwrap();

        let verifier = verifier(2);
        let cloned = verifier.clone();
        assert!(verifier.check(good.path()).await.is_ok());
        assert!(cloned.check(bad.path()).await.is_err());
        assert!(verifier.check(good.path()).await.is_ok());
    }
}
