//! Cryptographic primitives for Coffer.
//!
//! This module provides:
//! - Key derivation from a password using a one-way hash
//! - Keyed message authentication with constant-time verification
//! - Authenticated encryption of in-memory buffers (AES-CBC plus an HMAC tag)
//! - Streaming encryption of byte streams and files (AES-CBC, no tag)
//!
//! # Wire formats
//! Buffer payloads are laid out as `TAG || IV || CIPHERTEXT`, where the tag
//! authenticates everything after it. Streams and files are laid out as
//! `IV || CIPHERTEXT` with no tag at all; see [`stream`] for what that
//! implies for callers.
//!
//! # Security Guarantees
//! - Derived keys are automatically zeroized on drop
//! - No plaintext or key material is ever logged
//! - Constant-time comparison for tag verification

pub mod cipher;
pub mod inject;
pub mod kdf;
pub mod keys;
pub mod mac;
pub mod stream;
pub mod suite;

pub use cipher::{decrypt, encrypt, BLOCK_SIZE, IV_LENGTH};
pub use inject::IvInjector;
pub use kdf::{derive_cipher_key, derive_key};
pub use keys::CipherKey;
pub use mac::{compute_tag, verify_tag};
pub use stream::{
    decrypt_file, decrypt_stream, encrypt_file, encrypt_stream, DecryptingStream, EncryptingStream,
};
pub use suite::{CipherAlgorithm, CipherSuite, HashAlgorithm, TagEncoding};
