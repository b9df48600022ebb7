//! Algorithm selection for ciphers, hashes, and tag encodings.
//!
//! A [`CipherSuite`] bundles the caller-supplied algorithm identifiers and
//! derives every length the wire format depends on, so parsing offsets are
//! never hardcoded against one particular hash or encoding.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use coffer_common::{Error, Result};

/// Symmetric block cipher used for both buffer and stream payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherAlgorithm {
    /// AES-128 in CBC mode with PKCS#7 padding.
    #[serde(rename = "aes-128-cbc")]
    Aes128Cbc,
    /// AES-256 in CBC mode with PKCS#7 padding.
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
}

impl CipherAlgorithm {
    /// Key length in bytes required by this cipher.
    pub fn key_len(&self) -> usize {
        match self {
            CipherAlgorithm::Aes128Cbc => 16,
            CipherAlgorithm::Aes256Cbc => 32,
        }
    }

    /// Cipher block size in bytes.
    pub fn block_size(&self) -> usize {
        16
    }

    /// Initialization vector length in bytes.
    pub fn iv_len(&self) -> usize {
        self.block_size()
    }

    /// Canonical string identifier.
    pub fn identifier(&self) -> &'static str {
        match self {
            CipherAlgorithm::Aes128Cbc => "aes-128-cbc",
            CipherAlgorithm::Aes256Cbc => "aes-256-cbc",
        }
    }
}

impl Default for CipherAlgorithm {
    fn default() -> Self {
        CipherAlgorithm::Aes256Cbc
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for CipherAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "aes-128-cbc" | "aes128" => Ok(CipherAlgorithm::Aes128Cbc),
            "aes-256-cbc" | "aes256" => Ok(CipherAlgorithm::Aes256Cbc),
            other => Err(Error::InvalidInput(format!(
                "Unknown cipher algorithm: {}",
                other
            ))),
        }
    }
}

/// Hash used both for key derivation and as the HMAC core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Canonical string identifier.
    pub fn identifier(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Sha256
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(Error::InvalidInput(format!(
                "Unknown hash algorithm: {}",
                other
            ))),
        }
    }
}

/// Text encoding applied to the raw HMAC digest before it is embedded in a
/// buffer payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagEncoding {
    /// Lowercase hexadecimal, two bytes of output per digest byte.
    Hex,
    /// Standard padded base64.
    Base64,
    /// The raw digest bytes.
    Binary,
}

impl TagEncoding {
    /// Length of an encoded tag for a digest of `digest_len` bytes.
    pub fn encoded_len(&self, digest_len: usize) -> usize {
        match self {
            TagEncoding::Hex => digest_len * 2,
            TagEncoding::Base64 => digest_len.div_ceil(3) * 4,
            TagEncoding::Binary => digest_len,
        }
    }

    /// Encode a raw digest.
    pub fn encode(&self, digest: &[u8]) -> Vec<u8> {
        match self {
            TagEncoding::Hex => hex::encode(digest).into_bytes(),
            TagEncoding::Base64 => STANDARD.encode(digest).into_bytes(),
            TagEncoding::Binary => digest.to_vec(),
        }
    }

    /// Canonical string identifier.
    pub fn identifier(&self) -> &'static str {
        match self {
            TagEncoding::Hex => "hex",
            TagEncoding::Base64 => "base64",
            TagEncoding::Binary => "binary",
        }
    }
}

impl Default for TagEncoding {
    fn default() -> Self {
        TagEncoding::Hex
    }
}

impl fmt::Display for TagEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for TagEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hex" => Ok(TagEncoding::Hex),
            "base64" => Ok(TagEncoding::Base64),
            "binary" => Ok(TagEncoding::Binary),
            other => Err(Error::InvalidInput(format!(
                "Unknown tag encoding: {}",
                other
            ))),
        }
    }
}

/// Complete algorithm selection for one encryption operation.
///
/// The same suite must be supplied to both sides of a round trip; nothing in
/// the wire format records which suite produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CipherSuite {
    pub cipher: CipherAlgorithm,
    pub hash: HashAlgorithm,
    pub encoding: TagEncoding,
}

impl CipherSuite {
    /// Encoded authentication tag length in bytes for this suite.
    ///
    /// Derived from the hash and encoding so payload parsing stays correct
    /// when either changes.
    pub fn tag_len(&self) -> usize {
        self.encoding.encoded_len(self.hash.digest_len())
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.cipher, self.hash, self.encoding)
    }
}
