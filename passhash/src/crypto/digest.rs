//! One-way digest primitives the salted hasher can be built on.
//! The bindings only adapt RustCrypto hashers to a common object-safe trait;
//! no hashing is implemented here.

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;

/// A one-way hash function over byte sequences.
pub trait DigestPrimitive {
    /// Short lowercase identifier, e.g. `sha256`.
    fn name(&self) -> &'static str;

    /// Length in bytes of every digest this primitive produces.
    fn output_len(&self) -> usize;

    /// Hashes `input` and returns the raw digest.
    fn compute(&self, input: &[u8]) -> Vec<u8>;
}

/// MD5 binding.
///
/// MD5 is cryptographically broken. It exists only so artifacts produced by
/// `rabbit_password_hashing_md5` can still be regenerated; do not pick it for
/// new users.
#[derive(Debug, Default, Clone, Copy)]
pub struct Md5Digest;

impl DigestPrimitive for Md5Digest {
    fn name(&self) -> &'static str {
        "md5"
    }

    fn output_len(&self) -> usize {
        16
    }

    fn compute(&self, input: &[u8]) -> Vec<u8> {
        Md5::digest(input).to_vec()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Digest;

impl DigestPrimitive for Sha256Digest {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn output_len(&self) -> usize {
        32
    }

    fn compute(&self, input: &[u8]) -> Vec<u8> {
        Sha256::digest(input).to_vec()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sha512Digest;

impl DigestPrimitive for Sha512Digest {
    fn name(&self) -> &'static str {
        "sha512"
    }

    fn output_len(&self) -> usize {
        64
    }

    fn compute(&self, input: &[u8]) -> Vec<u8> {
        Sha512::digest(input).to_vec()
    }
}

#[derive(Debug, Error)]
#[error("unknown hashing algorithm '{0}'; expected md5, sha256 or sha512")]
pub struct UnknownAlgorithm(pub String);

/// Selects one of the supported digest primitives.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Broken; kept for backward compatibility only.
    #[value(name = "md5")]
    Md5,
    #[default]
    #[value(name = "sha256", alias = "sha-256")]
    #[serde(alias = "sha-256")]
    Sha256,
    #[value(name = "sha512", alias = "sha-512")]
    #[serde(alias = "sha-512")]
    Sha512,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Md5, Algorithm::Sha256, Algorithm::Sha512];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
        }
    }

    pub fn digest_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha256 => 32,
            Algorithm::Sha512 => 64,
        }
    }

    /// Builds a fresh primitive for this algorithm.
    pub fn primitive(&self) -> Box<dyn DigestPrimitive> {
        match self {
            Algorithm::Md5 => Box::new(Md5Digest),
            Algorithm::Sha256 => Box::new(Sha256Digest),
            Algorithm::Sha512 => Box::new(Sha512Digest),
        }
    }

    /// RabbitMQ hashing module that accepts digests of this algorithm, for the
    /// `hashing_algorithm` field of a definitions file.
    pub fn rabbitmq_module(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "rabbit_password_hashing_md5",
            Algorithm::Sha256 => "rabbit_password_hashing_sha256",
            Algorithm::Sha512 => "rabbit_password_hashing_sha512",
        }
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self, Algorithm::Md5)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha256" | "sha-256" => Ok(Algorithm::Sha256),
            "sha512" | "sha-512" => Ok(Algorithm::Sha512),
            _ => Err(UnknownAlgorithm(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Algorithm, DigestPrimitive, Md5Digest, Sha256Digest, Sha512Digest};
    use hex::ToHex;

    #[test]
    fn bindings_match_known_vectors() {
        assert_eq!(
            Md5Digest.compute(b"abc").encode_hex::<String>(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            Sha256Digest.compute(b"test").encode_hex::<String>(),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
        assert_eq!(
            Sha512Digest.compute(b"test").encode_hex::<String>(),
            "ee26b0dd4af7e749aa1a8ee3c10ae9923f618980772e473f8819a5d4940e0db27ac185f8a0e1d5f84f88bc887fd67b143732c304cc5fa9ad8e6f57f50028a8ff"
        );
    }

    #[test]
    fn output_len_matches_computed_digest() {
        for algorithm in Algorithm::ALL {
            let primitive = algorithm.primitive();
            assert_eq!(primitive.output_len(), algorithm.digest_len());
            assert_eq!(primitive.compute(b"payload").len(), algorithm.digest_len());
            assert_eq!(primitive.name(), algorithm.as_str());
        }
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("md5".parse::<Algorithm>().unwrap(), Algorithm::Md5);
        assert_eq!("SHA256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
        assert_eq!("sha-512".parse::<Algorithm>().unwrap(), Algorithm::Sha512);
        let err = "sha1".parse::<Algorithm>().unwrap_err();
        assert!(format!("{err}").contains("unknown hashing algorithm 'sha1'"));
    }

    #[test]
    fn defaults_to_sha256() {
        assert_eq!(Algorithm::default(), Algorithm::Sha256);
        assert!(Algorithm::Md5.is_deprecated());
        assert!(!Algorithm::default().is_deprecated());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Algorithm::Sha512).unwrap();
        assert_eq!(json, "\"sha512\"");
        let parsed: Algorithm = serde_json::from_str("\"sha-256\"").unwrap();
        assert_eq!(parsed, Algorithm::Sha256);
    }

    #[test]
    fn names_rabbitmq_modules() {
        assert_eq!(Algorithm::Sha256.rabbitmq_module(), "rabbit_password_hashing_sha256");
        assert_eq!(Algorithm::Md5.rabbitmq_module(), "rabbit_password_hashing_md5");
    }
}
