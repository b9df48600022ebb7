//! Authenticated buffer encryption.
//!
//! Payloads carry an HMAC tag ahead of the IV and ciphertext:
//!
//! ```text
//! [tag: suite.tag_len() bytes][iv: 16 bytes][ciphertext: padded to 16]
//! ```
//!
//! The tag covers `IV || CIPHERTEXT` and is checked before the cipher runs,
//! so a tampered or wrong-password payload is rejected without any
//! decryption work.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};

use crate::kdf::derive_cipher_key;
use crate::keys::CipherKey;
use crate::mac::{compute_tag, verify_tag};
use crate::suite::{CipherAlgorithm, CipherSuite};
use coffer_common::{Error, Result};

/// Initialization vector length in bytes.
pub const IV_LENGTH: usize = 16;

/// Cipher block size in bytes.
pub const BLOCK_SIZE: usize = 16;

pub(crate) type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
pub(crate) type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
pub(crate) type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
pub(crate) type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Generate a fresh IV from the operating system's secure random source.
pub(crate) fn generate_iv() -> [u8; IV_LENGTH] {
    let mut iv = [0u8; IV_LENGTH];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypt a buffer under a password.
///
/// # Preconditions
/// - `password` must not be empty
///
/// # Postconditions
/// - Returns `tag || iv || ciphertext`
/// - The IV is freshly generated, so identical inputs produce different
///   payloads on every call
///
/// # Errors
/// - Returns `Error::InvalidInput` if the password is empty
/// - Returns `Error::Crypto` if the suite's hash cannot key the suite's
///   cipher
///
/// # Security
/// - The tag is an HMAC over `iv || ciphertext` under the same key
/// - The password and derived key are never logged
pub fn encrypt(plaintext: &[u8], password: &str, suite: &CipherSuite) -> Result<Vec<u8>> {
    let key = derive_cipher_key(password, suite)?;
    let iv = generate_iv();

    let ciphertext = cbc_encrypt(suite.cipher, &key, &iv, plaintext)?;

    let mut sealed = Vec::with_capacity(IV_LENGTH + ciphertext.len());
    sealed.extend_from_slice(&iv);
    sealed.extend_from_slice(&ciphertext);

    let tag = compute_tag(&key, &sealed, suite.hash, suite.encoding)?;

    // Prepend the tag to the sealed bytes
    let mut payload = Vec::with_capacity(tag.len() + sealed.len());
    payload.extend_from_slice(&tag);
    payload.extend_from_slice(&sealed);

    Ok(payload)
}

/// Decrypt a buffer produced by [`encrypt`].
///
/// # Preconditions
/// - `payload` must be at least `suite.tag_len() + IV_LENGTH` bytes
///
/// # Postconditions
/// - Returns the original plaintext
/// - The tag is verified in constant time before the cipher touches any
///   ciphertext byte
///
/// # Errors
/// - Returns `Error::InvalidInput` if the password is empty or the payload
///   is shorter than a tag plus an IV
/// - Returns `Error::Authentication` if the tag does not match
/// - Returns `Error::Decryption` if the ciphertext is malformed or its
///   padding is invalid
pub fn decrypt(payload: &[u8], password: &str, suite: &CipherSuite) -> Result<Vec<u8>> {
    let key = derive_cipher_key(password, suite)?;

    let tag_len = suite.tag_len();
    if payload.len() < tag_len + IV_LENGTH {
        return Err(Error::InvalidInput(format!(
            "Payload is {} bytes, expected at least {}",
            payload.len(),
            tag_len + IV_LENGTH
        )));
    }

    let (tag, sealed) = payload.split_at(tag_len);
    if !verify_tag(&key, sealed, suite.hash, suite.encoding, tag) {
        return Err(Error::Authentication(
            "Authentication tag does not match payload".to_string(),
        ));
    }

    let (iv, ciphertext) = sealed.split_at(IV_LENGTH);
    cbc_decrypt(suite.cipher, &key, iv, ciphertext)
}

fn cbc_encrypt(
    algorithm: CipherAlgorithm,
    key: &CipherKey,
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let ciphertext = match algorithm {
        CipherAlgorithm::Aes128Cbc => Aes128CbcEnc::new_from_slices(key.as_bytes(), iv)
            .map_err(|e| Error::Crypto(format!("Cipher setup failed: {}", e)))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        CipherAlgorithm::Aes256Cbc => Aes256CbcEnc::new_from_slices(key.as_bytes(), iv)
            .map_err(|e| Error::Crypto(format!("Cipher setup failed: {}", e)))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
    };

    Ok(ciphertext)
}

fn cbc_decrypt(
    algorithm: CipherAlgorithm,
    key: &CipherKey,
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let plaintext = match algorithm {
        CipherAlgorithm::Aes128Cbc => Aes128CbcDec::new_from_slices(key.as_bytes(), iv)
            .map_err(|e| Error::Crypto(format!("Cipher setup failed: {}", e)))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        CipherAlgorithm::Aes256Cbc => Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
            .map_err(|e| Error::Crypto(format!("Cipher setup failed: {}", e)))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
    };

    plaintext.map_err(|_| Error::Decryption("Bad padding or corrupted ciphertext".to_string()))
}
