//! Salt generation backed by the operating system CSPRNG.
//! The source is an explicit value owned by whoever hashes, so tests can swap
//! in a fixed or counting source without touching global state.

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Salt length used by RabbitMQ's password hashing modules.
pub const SALT_LENGTH: usize = 4;

#[derive(Debug, Error)]
pub enum SaltError {
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

/// Anything that can fill a buffer with unpredictable bytes.
#[cfg_attr(test, mockall::automock)]
pub trait SaltSource {
    /// Fills every byte of `buf`.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), SaltError>;
}

/// Salt source reading from the operating system's random number generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSaltSource;

impl SaltSource for OsSaltSource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), SaltError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| SaltError::EntropyUnavailable(format!("{e}")))
    }
}

/// Returns `length` fresh salt bytes drawn from `source`.
pub fn generate(source: &mut dyn SaltSource, length: usize) -> Result<Vec<u8>, SaltError> {
    let mut salt = vec![0u8; length];
    source.fill(&mut salt)?;
    Ok(salt)
}

/// Always yields the same bytes. Only meant for fixtures and reproducible
/// examples; never use it to hash real passwords.
#[derive(Debug, Clone)]
pub struct FixedSaltSource {
    bytes: Vec<u8>,
}

impl FixedSaltSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }
}

impl SaltSource for FixedSaltSource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), SaltError> {
        if buf.len() != self.bytes.len() {
            return Err(SaltError::EntropyUnavailable(format!(
                "fixed salt holds {} bytes, {} requested",
                self.bytes.len(),
                buf.len()
            )));
        }
        buf.copy_from_slice(&self.bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{generate, FixedSaltSource, MockSaltSource, OsSaltSource, SaltError, SALT_LENGTH};
    use std::collections::HashSet;

    #[test]
    fn generates_requested_length() {
        let mut source = OsSaltSource;
        for length in [0, 1, SALT_LENGTH, 16, 64] {
            let salt = generate(&mut source, length).expect("os rng should be available");
            assert_eq!(salt.len(), length);
        }
    }

    #[test]
    fn os_salts_do_not_repeat() {
        let mut source = OsSaltSource;
        let salts: HashSet<Vec<u8>> = (0..64)
            .map(|_| generate(&mut source, 16).expect("os rng should be available"))
            .collect();
        assert_eq!(salts.len(), 64);
    }

    #[test]
    fn fixed_source_rejects_length_mismatch() {
        let mut source = FixedSaltSource::new([1u8, 2, 3, 4]);
        assert_eq!(generate(&mut source, 4).expect("lengths match"), vec![1, 2, 3, 4]);
        let err = generate(&mut source, 8).unwrap_err();
        assert!(format!("{err}").contains("4 bytes, 8 requested"));
    }

    #[test]
    fn propagates_entropy_failure() {
        let mut source = MockSaltSource::new();
        source
            .expect_fill()
            .times(1)
            .returning(|_| Err(SaltError::EntropyUnavailable("getrandom failed".to_string())));
        let err = generate(&mut source, SALT_LENGTH).unwrap_err();
        assert!(matches!(err, SaltError::EntropyUnavailable(_)));
    }
}
