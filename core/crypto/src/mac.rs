//! Keyed message authentication.
//!
//! Tags are HMAC digests over the supplied bytes, text-encoded per the
//! suite's encoding. Verification recomputes the tag and compares it in
//! constant time so the comparison leaks nothing through timing.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::keys::CipherKey;
use crate::suite::{HashAlgorithm, TagEncoding};
use coffer_common::{Error, Result};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Compute an authentication tag over `data`.
///
/// The raw HMAC digest is encoded per `encoding` before being returned, so
/// the result is exactly the byte sequence embedded in buffer payloads.
///
/// # Errors
/// - Returns `Error::Crypto` if the MAC cannot be keyed
pub fn compute_tag(
    key: &CipherKey,
    data: &[u8],
    hash: HashAlgorithm,
    encoding: TagEncoding,
) -> Result<Vec<u8>> {
    let digest = match hash {
        HashAlgorithm::Sha256 => {
            let mut mac = HmacSha256::new_from_slice(key.as_bytes())
                .map_err(|e| Error::Crypto(format!("Failed to key MAC: {}", e)))?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha512 => {
            let mut mac = HmacSha512::new_from_slice(key.as_bytes())
                .map_err(|e| Error::Crypto(format!("Failed to key MAC: {}", e)))?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    };

    Ok(encoding.encode(&digest))
}

/// Verify an authentication tag over `data`.
///
/// Recomputes the tag and compares it with the expected value in constant
/// time. Returns `false` on any mismatch, including a length mismatch or an
/// internal failure, leaving the caller to decide how to fail.
pub fn verify_tag(
    key: &CipherKey,
    data: &[u8],
    hash: HashAlgorithm,
    encoding: TagEncoding,
    expected: &[u8],
) -> bool {
    match compute_tag(key, data, hash, encoding) {
        Ok(actual) => actual.as_slice().ct_eq(expected).into(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> CipherKey {
        CipherKey::from_bytes(vec![0x42; 32])
    }

    #[test]
    fn test_hmac_sha256_known_answer() {
        let key = CipherKey::from_bytes(b"key".to_vec());
        let tag = compute_tag(
            &key,
            b"The quick brown fox jumps over the lazy dog",
            HashAlgorithm::Sha256,
            TagEncoding::Hex,
        )
        .unwrap();

        assert_eq!(
            tag,
            b"f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8".to_vec()
        );
    }

    #[test]
    fn test_compute_tag_deterministic() {
        let tag1 = compute_tag(&test_key(), b"data", HashAlgorithm::Sha256, TagEncoding::Hex)
            .unwrap();
        let tag2 = compute_tag(&test_key(), b"data", HashAlgorithm::Sha256, TagEncoding::Hex)
            .unwrap();

        assert_eq!(tag1, tag2);
    }

    #[test]
    fn test_verify_accepts_valid_tag() {
        let key = test_key();
        let tag = compute_tag(&key, b"payload", HashAlgorithm::Sha256, TagEncoding::Hex).unwrap();

        assert!(verify_tag(
            &key,
            b"payload",
            HashAlgorithm::Sha256,
            TagEncoding::Hex,
            &tag
        ));
    }

    #[test]
    fn test_verify_rejects_modified_data() {
        let key = test_key();
        let tag = compute_tag(&key, b"payload", HashAlgorithm::Sha256, TagEncoding::Hex).unwrap();

        assert!(!verify_tag(
            &key,
            b"paylaod",
            HashAlgorithm::Sha256,
            TagEncoding::Hex,
            &tag
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let tag = compute_tag(&test_key(), b"payload", HashAlgorithm::Sha256, TagEncoding::Hex)
            .unwrap();
        let other = CipherKey::from_bytes(vec![0x43; 32]);

        assert!(!verify_tag(
            &other,
            b"payload",
            HashAlgorithm::Sha256,
            TagEncoding::Hex,
            &tag
        ));
    }

    #[test]
    fn test_verify_rejects_truncated_tag() {
        let key = test_key();
        let tag = compute_tag(&key, b"payload", HashAlgorithm::Sha256, TagEncoding::Hex).unwrap();

        assert!(!verify_tag(
            &key,
            b"payload",
            HashAlgorithm::Sha256,
            TagEncoding::Hex,
            &tag[..tag.len() - 1]
        ));
    }

    #[test]
    fn test_tag_length_follows_hash_and_encoding() {
        let key = test_key();
        let cases = [
            (HashAlgorithm::Sha256, TagEncoding::Hex, 64),
            (HashAlgorithm::Sha256, TagEncoding::Base64, 44),
            (HashAlgorithm::Sha256, TagEncoding::Binary, 32),
            (HashAlgorithm::Sha512, TagEncoding::Hex, 128),
            (HashAlgorithm::Sha512, TagEncoding::Base64, 88),
            (HashAlgorithm::Sha512, TagEncoding::Binary, 64),
        ];

        for (hash, encoding, expected) in cases {
            let tag = compute_tag(&key, b"data", hash, encoding).unwrap();
            assert_eq!(tag.len(), expected);
            assert_eq!(encoding.encoded_len(hash.digest_len()), expected);
        }
    }
}
