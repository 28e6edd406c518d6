#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Streaming file digests for sigcheck
//!
//! This crate computes the digest of a single file by feeding fixed-size
//! chunks into a running [`Hasher`] accumulator. The algorithm is chosen at
//! runtime through [`DigestAlgorithm`]; the streaming code only ever sees the
//! accumulator trait.

mod file_hasher;
mod hasher;

pub use file_hasher::FileHasher;
pub use hasher::{Blake3Hasher, Hasher, RustCryptoHasher};

use serde::{Deserialize, Serialize};
use sigcheck_errors::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Size of chunks for streaming hash computation
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// Digest algorithms a manifest can be written with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-1, the `sha1sum` manifest format
    #[default]
    Sha1,
    Sha256,
    Sha512,
    Md5,
    Blake3,
}

impl DigestAlgorithm {
    /// Every supported algorithm, in display order
    pub const ALL: [Self; 5] = [
        Self::Sha1,
        Self::Sha256,
        Self::Sha512,
        Self::Md5,
        Self::Blake3,
    ];

    /// Length of the raw digest in bytes
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 | Self::Blake3 => 32,
            Self::Sha512 => 64,
            Self::Md5 => 16,
        }
    }

    /// Length of the hex-encoded digest
    #[must_use]
    pub const fn hex_len(self) -> usize {
        self.digest_len() * 2
    }

    /// Canonical lowercase name, as accepted by configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Md5 => "md5",
            Self::Blake3 => "blake3",
        }
    }

    /// Conventional manifest file name for this algorithm (`sha1sum.txt` etc.)
    #[must_use]
    pub fn default_manifest_name(self) -> String {
        format!("{}sum.txt", self.as_str())
    }

    /// Whether `s` is a well-formed hex digest for this algorithm
    #[must_use]
    pub fn is_valid_hex(self, s: &str) -> bool {
        s.len() == self.hex_len() && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Create a fresh accumulator for this algorithm
    #[must_use]
    pub fn hasher(self) -> Box<dyn Hasher> {
        match self {
            Self::Sha1 => Box::new(RustCryptoHasher::<sha1::Sha1>::new()),
            Self::Sha256 => Box::new(RustCryptoHasher::<sha2::Sha256>::new()),
            Self::Sha512 => Box::new(RustCryptoHasher::<sha2::Sha512>::new()),
            Self::Md5 => Box::new(RustCryptoHasher::<md5::Md5>::new()),
            Self::Blake3 => Box::new(Blake3Hasher::new()),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "md5" => Ok(Self::Md5),
            "blake3" => Ok(Self::Blake3),
            _ => Err(ConfigError::InvalidValue {
                field: "algorithm".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// A computed digest value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: DigestAlgorithm,
    bytes: Vec<u8>,
}

impl Digest {
    /// Wrap raw digest bytes
    #[must_use]
    pub fn from_bytes(algorithm: DigestAlgorithm, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    /// Compute the digest of an in-memory byte slice
    #[must_use]
    pub fn from_data(algorithm: DigestAlgorithm, data: &[u8]) -> Self {
        let mut hasher = algorithm.hasher();
        hasher.update(data);
        Self::from_bytes(algorithm, hasher.finalize())
    }

    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Get the raw bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Convert to lowercase hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Compare against a hex digest, ignoring case
    #[must_use]
    pub fn matches_hex(&self, expected: &str) -> bool {
        self.to_hex().eq_ignore_ascii_case(expected)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests;
