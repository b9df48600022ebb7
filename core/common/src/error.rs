//! Common error types for Coffer.

use thiserror::Error;

/// Top-level error type for Coffer operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input provided, such as an empty password or a payload too
    /// short to hold a tag and an IV.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication tag verification failed. Raised only by the buffer
    /// path, which checks the tag before running the cipher.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Cipher finalization failed: wrong key, corrupted ciphertext, or bad
    /// padding. The streaming path has no tag, so this is its only signal.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Cryptographic primitive setup or computation failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    /// Carry a typed error across an `std::io` boundary, such as out of an
    /// `AsyncRead` adapter. The original error can be recovered on the other
    /// side with [`std::io::Error::downcast`].
    fn from(err: Error) -> Self {
        match err {
            Error::Io(inner) => inner,
            Error::InvalidInput(msg) => std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                Error::InvalidInput(msg),
            ),
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}
