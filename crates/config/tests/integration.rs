//! Integration tests for config

#[cfg(test)]
mod tests {
    use sigcheck_config::*;
    use sigcheck_errors::{ConfigError, Error};
    use sigcheck_hash::DigestAlgorithm;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[verify]
manifest_filename = "SHA256SUMS"
concurrency = 8
chunk_size = 8192
algorithm = "sha256"
timeout_secs = 120
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.verify.manifest_filename(), "SHA256SUMS");
        assert_eq!(config.verify.concurrency(), 8);
        assert_eq!(config.verify.chunk_size, 8192);
        assert_eq!(config.verify.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(config.verify.timeout(), Some(Duration::from_secs(120)));
    }

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[verify]\nconcurrency = 2").unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.verify.concurrency, 2);
        assert_eq!(config.verify.chunk_size, 64 * 1024);
        assert_eq!(config.verify.manifest_filename(), "sha1sum.txt");
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[verify\nconcurrency = ").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }

    #[tokio::test]
    async fn test_unknown_algorithm_in_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[verify]\nalgorithm = \"crc32\"").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn test_missing_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_or_default(Some(&dir.path().join("absent.toml")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unreadable_config_keeps_cause() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::Unreadable { ref message, .. }) if !message.is_empty()
        ));
        assert!(!err.to_string().contains("not found"));

        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Unreadable { .. })));
    }

    #[tokio::test]
    async fn test_manifest_outside_root_rejected_in_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[verify]\nmanifest_filename = \"../evil.txt\"").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.verify.concurrency = 4;
        config.verify.algorithm = DigestAlgorithm::Md5;

        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
