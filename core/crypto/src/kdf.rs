//! Key derivation from a password.
//!
//! The cipher key is the plain digest of the password under the selected
//! hash. Derivation is deliberately deterministic, with no salt and no work
//! factor, so any party holding the same password derives the same key. The
//! flip side is that derivation adds no resistance to dictionary attacks; a
//! weak password yields a weak key.

use sha2::{Digest, Sha256, Sha512};

use crate::keys::CipherKey;
use crate::suite::{CipherSuite, HashAlgorithm};
use coffer_common::{Error, Result};

/// Derive a cipher key from a password.
///
/// # Preconditions
/// - `password` must not be empty
///
/// # Postconditions
/// - Returns a key of `hash.digest_len()` bytes
/// - The same password and hash always yield the same key
///
/// # Errors
/// - Returns `Error::InvalidInput` if the password is empty
///
/// # Security
/// - The password is not stored or logged
/// - The returned key zeroizes its memory on drop
pub fn derive_key(password: &str, hash: HashAlgorithm) -> Result<CipherKey> {
    if password.is_empty() {
        return Err(Error::InvalidInput("Password cannot be empty".to_string()));
    }

    let digest = match hash {
        HashAlgorithm::Sha256 => Sha256::digest(password.as_bytes()).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(password.as_bytes()).to_vec(),
    };

    Ok(CipherKey::from_bytes(digest))
}

/// Derive a cipher key and check it against the suite's cipher.
///
/// Both the buffer and the streaming paths derive their key through this
/// function, which rejects suites whose hash output cannot key the selected
/// cipher before any cipher work happens.
///
/// # Errors
/// - Returns `Error::InvalidInput` if the password is empty
/// - Returns `Error::Crypto` if the digest length does not match the cipher
///   key length
pub fn derive_cipher_key(password: &str, suite: &CipherSuite) -> Result<CipherKey> {
    let key = derive_key(password, suite.hash)?;

    if key.len() != suite.cipher.key_len() {
        return Err(Error::Crypto(format!(
            "{} digest is {} bytes but {} requires a {}-byte key",
            suite.hash,
            key.len(),
            suite.cipher,
            suite.cipher.key_len()
        )));
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::CipherAlgorithm;

    #[test]
    fn test_derive_key_deterministic() {
        let key1 = derive_key("test-password-123", HashAlgorithm::Sha256).unwrap();
        let key2 = derive_key("test-password-123", HashAlgorithm::Sha256).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_password() {
        let key1 = derive_key("password1", HashAlgorithm::Sha256).unwrap();
        let key2 = derive_key("password2", HashAlgorithm::Sha256).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_hash() {
        let key1 = derive_key("password", HashAlgorithm::Sha256).unwrap();
        let key2 = derive_key("password", HashAlgorithm::Sha512).unwrap();

        assert_ne!(key1.as_bytes(), &key2.as_bytes()[..32]);
    }

    #[test]
    fn test_derive_key_empty_password_fails() {
        assert!(matches!(
            derive_key("", HashAlgorithm::Sha256),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_derive_key_known_answer() {
        let key = derive_key("password", HashAlgorithm::Sha256).unwrap();

        assert_eq!(
            hex::encode(key.as_bytes()),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_key_length_follows_hash() {
        assert_eq!(derive_key("pw", HashAlgorithm::Sha256).unwrap().len(), 32);
        assert_eq!(derive_key("pw", HashAlgorithm::Sha512).unwrap().len(), 64);
    }

    #[test]
    fn test_derive_cipher_key_checks_key_length() {
        let suite = CipherSuite::default();
        assert_eq!(derive_cipher_key("pw", &suite).unwrap().len(), 32);

        let oversized = CipherSuite {
            hash: HashAlgorithm::Sha512,
            ..CipherSuite::default()
        };
        assert!(matches!(
            derive_cipher_key("pw", &oversized),
            Err(Error::Crypto(_))
        ));

        let undersized = CipherSuite {
            cipher: CipherAlgorithm::Aes128Cbc,
            ..CipherSuite::default()
        };
        assert!(matches!(
            derive_cipher_key("pw", &undersized),
            Err(Error::Crypto(_))
        ));
    }
}
