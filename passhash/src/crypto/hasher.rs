//! Salted password hashing in the RabbitMQ user database format.
//!
//! Every artifact is `base64(salt ++ digest(salt ++ utf8(password)))` with a
//! fresh salt per call. The digest function is pluggable; the salt handling
//! and encoding are shared by all algorithms.

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;
use zeroize::Zeroize;

use super::digest::{Algorithm, DigestPrimitive};
use super::salt::{self, OsSaltSource, SaltError, SaltSource, SALT_LENGTH};

#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("hasher has already been released")]
    Released,
}

impl From<SaltError> for HashError {
    fn from(value: SaltError) -> Self {
        HashError::Internal(format!("{value}"))
    }
}

/// Produces salted digests with one digest primitive and one salt source,
/// both owned for the lifetime of the hasher.
pub struct SaltedHasher {
    primitive: Option<Box<dyn DigestPrimitive>>,
    salt_source: Option<Box<dyn SaltSource>>,
    salt_length: usize,
}

impl SaltedHasher {
    /// Builds a hasher around `primitive` with OS randomness and a 4 byte salt.
    pub fn new(primitive: Box<dyn DigestPrimitive>) -> Self {
        Self::with_salt_source(primitive, Box::new(OsSaltSource), SALT_LENGTH)
    }

    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        Self::new(algorithm.primitive())
    }

    pub fn with_salt_source(
        primitive: Box<dyn DigestPrimitive>,
        salt_source: Box<dyn SaltSource>,
        salt_length: usize,
    ) -> Self {
        Self {
            primitive: Some(primitive),
            salt_source: Some(salt_source),
            salt_length,
        }
    }

    pub fn salt_length(&self) -> usize {
        self.salt_length
    }

    /// Name of the active primitive, `None` once released.
    pub fn algorithm_name(&self) -> Option<&'static str> {
        self.primitive.as_ref().map(|p| p.name())
    }

    /// Length of a decoded artifact, `None` once released.
    pub fn artifact_len(&self) -> Option<usize> {
        self.primitive
            .as_ref()
            .map(|p| self.salt_length + p.output_len())
    }

    /// Hashes `password` with a freshly drawn salt and returns the base64 artifact.
    pub fn hash(&mut self, password: &str) -> Result<String, HashError> {
        self.hash_opt(Some(password))
    }

    /// Same as [`SaltedHasher::hash`], treating `None` as a missing password.
    pub fn hash_opt(&mut self, password: Option<&str>) -> Result<String, HashError> {
        let password = match password {
            Some(p) if !p.is_empty() => p,
            _ => {
                return Err(HashError::InvalidInput(
                    "password must not be empty".to_string(),
                ))
            }
        };

        let (primitive, salt_source) = match (&self.primitive, &mut self.salt_source) {
            (Some(primitive), Some(salt_source)) => (primitive, salt_source),
            _ => return Err(HashError::Released),
        };

        let salt = salt::generate(&mut **salt_source, self.salt_length)?;
        let digest = salted_digest(&**primitive, &salt, password)?;

        let mut output = Vec::with_capacity(salt.len() + digest.len());
        output.extend_from_slice(&salt);
        output.extend_from_slice(&digest);
        Ok(STANDARD.encode(output))
    }

    /// Checks `password` against a previously produced artifact by reusing its salt.
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, HashError> {
        if password.is_empty() {
            return Err(HashError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        let primitive = self.primitive.as_ref().ok_or(HashError::Released)?;
        let (salt, stored_digest) =
            decode_artifact(encoded, self.salt_length, primitive.output_len())?;
        let digest = salted_digest(&**primitive, &salt, password)?;
        Ok(digest == stored_digest)
    }

    /// Drops the digest primitive and the salt source. Safe to call repeatedly.
    pub fn release(&mut self) {
        let had_resources = self.primitive.is_some() || self.salt_source.is_some();
        self.primitive = None;
        self.salt_source = None;
        if had_resources {
            log::debug!("salted hasher released");
        }
    }

    pub fn is_released(&self) -> bool {
        self.primitive.is_none() && self.salt_source.is_none()
    }
}

impl Drop for SaltedHasher {
    fn drop(&mut self) {
        self.release();
    }
}

/// Splits a base64 artifact into `(salt, digest)`, checking its decoded length.
pub fn decode_artifact(
    encoded: &str,
    salt_length: usize,
    digest_len: usize,
) -> Result<(Vec<u8>, Vec<u8>), HashError> {
    let mut decoded = STANDARD
        .decode(encoded.trim().as_bytes())
        .map_err(|e| HashError::InvalidInput(format!("artifact is not valid base64: {e}")))?;
    let expected = salt_length + digest_len;
    if decoded.len() != expected {
        return Err(HashError::InvalidInput(format!(
            "artifact decodes to {} bytes, expected {expected}",
            decoded.len()
        )));
    }
    let digest = decoded.split_off(salt_length);
    Ok((decoded, digest))
}

fn salted_digest(
    primitive: &dyn DigestPrimitive,
    salt: &[u8],
    password: &str,
) -> Result<Vec<u8>, HashError> {
    let password_bytes = password.as_bytes();
    let mut salted_input = Vec::with_capacity(salt.len() + password_bytes.len());
    salted_input.extend_from_slice(salt);
    salted_input.extend_from_slice(password_bytes);

    let digest = primitive.compute(&salted_input);
    salted_input.zeroize();

    if digest.is_empty() {
        return Err(HashError::Internal(format!(
            "{} digest primitive returned no bytes",
            primitive.name()
        )));
    }
    Ok(digest)
}
