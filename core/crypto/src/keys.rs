//! Key types with secure memory handling.
//!
//! Derived keys automatically zeroize their memory on drop so key material
//! does not persist after an operation completes.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Cipher key derived from a caller-supplied password.
///
/// A key exists only for the duration of one buffer operation or one
/// streaming pipeline and is wiped on every exit path, including errors,
/// when the value is dropped. Its length follows the hash that derived it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey {
    bytes: Vec<u8>,
}

impl CipherKey {
    /// Wrap raw derived bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherKey([REDACTED; {} bytes])", self.bytes.len())
    }
}
