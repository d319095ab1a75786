//! Salted digest core: a salt source, the digest primitives and the hasher
//! that combines them. Nothing in here performs I/O.

pub mod digest;
pub mod hasher;
pub mod salt;

pub use digest::{Algorithm, DigestPrimitive};
pub use hasher::{HashError, SaltedHasher};
pub use salt::{OsSaltSource, SaltSource, SALT_LENGTH};
