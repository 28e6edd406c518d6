//! Known-answer tests for the supported digest algorithms

use super::*;

const HELLO: &[u8] = b"hello world";

#[test]
fn test_known_digests() {
    let cases = [
        (
            DigestAlgorithm::Sha1,
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed",
        ),
        (
            DigestAlgorithm::Sha256,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
        ),
        (DigestAlgorithm::Md5, "5eb63bbbe01eeed093cb22bb8f5acdc3"),
        (
            DigestAlgorithm::Blake3,
            "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24",
        ),
    ];

    for (algorithm, expected) in cases {
        let digest = Digest::from_data(algorithm, HELLO);
        assert_eq!(digest.to_hex(), expected, "{algorithm}");
    }
}

#[test]
fn test_digest_lengths_match_algorithm() {
    for algorithm in DigestAlgorithm::ALL {
        let digest = Digest::from_data(algorithm, HELLO);
        assert_eq!(digest.as_bytes().len(), algorithm.digest_len());
        assert_eq!(digest.to_hex().len(), algorithm.hex_len());
        assert!(algorithm.is_valid_hex(&digest.to_hex()));
    }
}

#[test]
fn test_empty_input_sha1() {
    let digest = Digest::from_data(DigestAlgorithm::Sha1, b"");
    assert_eq!(digest.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
}

#[test]
fn test_matches_hex_ignores_case() {
    let digest = Digest::from_data(DigestAlgorithm::Sha1, HELLO);
    assert!(digest.matches_hex("2AAE6C35C94FCFB415DBE95F408B9CE91EE846ED"));
    assert!(digest.matches_hex("2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"));
    assert!(!digest.matches_hex("2aae6c35c94fcfb415dbe95f408b9ce91ee846ee"));
}

#[test]
fn test_is_valid_hex() {
    let sha1 = DigestAlgorithm::Sha1;
    assert!(sha1.is_valid_hex(&"a".repeat(40)));
    assert!(sha1.is_valid_hex(&"F".repeat(40)));
    assert!(!sha1.is_valid_hex(&"a".repeat(39)));
    assert!(!sha1.is_valid_hex(&"a".repeat(64)));
    assert!(!sha1.is_valid_hex(&"g".repeat(40)));
}

#[test]
fn test_algorithm_parsing() {
    assert_eq!("sha1".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha1);
    assert_eq!("SHA-256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
    assert_eq!("Blake3".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Blake3);
    assert!("crc32".parse::<DigestAlgorithm>().is_err());

    for algorithm in DigestAlgorithm::ALL {
        assert_eq!(algorithm.as_str().parse::<DigestAlgorithm>().unwrap(), algorithm);
    }
}

#[test]
fn test_default_manifest_name() {
    assert_eq!(DigestAlgorithm::default(), DigestAlgorithm::Sha1);
    assert_eq!(DigestAlgorithm::Sha1.default_manifest_name(), "sha1sum.txt");
    assert_eq!(DigestAlgorithm::Sha256.default_manifest_name(), "sha256sum.txt");
}

#[test]
fn test_digest_serialization() {
    let digest = Digest::from_data(DigestAlgorithm::Sha1, HELLO);
    let json = serde_json::to_string(&digest).unwrap();
    assert_eq!(json, "\"2aae6c35c94fcfb415dbe95f408b9ce91ee846ed\"");

    let algorithm = serde_json::to_string(&DigestAlgorithm::Sha256).unwrap();
    assert_eq!(algorithm, "\"sha256\"");
}
