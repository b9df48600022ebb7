//! Streaming encryption for files and byte streams.
//!
//! Streams carry the IV ahead of the ciphertext and nothing else:
//!
//! ```text
//! [iv: 16 bytes][ciphertext: padded to 16]
//! ```
//!
//! Unlike the buffer format in [`crate::cipher`], the stream format has
//! **no authentication tag**. Tampering surfaces, at best, as a late padding
//! failure after plaintext has already reached the destination, and a tamper
//! that leaves valid padding is not detected at all. Callers must treat the
//! destination as untrustworthy and discard it whenever decryption fails.

use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use aes::cipher::block_padding::{Pkcs7, RawPadding};
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tracing::{debug, info};

use crate::cipher::{
    generate_iv, Aes128CbcDec, Aes128CbcEnc, Aes256CbcDec, Aes256CbcEnc, BLOCK_SIZE, IV_LENGTH,
};
use crate::inject::IvInjector;
use crate::kdf::derive_cipher_key;
use crate::keys::CipherKey;
use crate::suite::{CipherAlgorithm, CipherSuite};
use coffer_common::{Error, Result};

/// Bytes pulled from the source per poll (8 KiB).
const READ_CHUNK: usize = 8 * 1024;

/// Incremental CBC encryptor over the supported cipher algorithms.
///
/// Chaining state carries across calls, so blocks must be fed in stream
/// order.
enum CbcEncryptor {
    Aes128(Aes128CbcEnc),
    Aes256(Aes256CbcEnc),
}

impl CbcEncryptor {
    fn new(algorithm: CipherAlgorithm, key: &CipherKey, iv: &[u8]) -> Result<Self> {
        match algorithm {
            CipherAlgorithm::Aes128Cbc => Aes128CbcEnc::new_from_slices(key.as_bytes(), iv)
                .map(Self::Aes128)
                .map_err(|e| Error::Crypto(format!("Cipher setup failed: {}", e))),
            CipherAlgorithm::Aes256Cbc => Aes256CbcEnc::new_from_slices(key.as_bytes(), iv)
                .map(Self::Aes256)
                .map_err(|e| Error::Crypto(format!("Cipher setup failed: {}", e))),
        }
    }

    /// Encrypt `data` in place. The length must be a multiple of
    /// [`BLOCK_SIZE`].
    fn encrypt_blocks(&mut self, data: &mut [u8]) {
        for block in data.chunks_exact_mut(BLOCK_SIZE) {
            let block = GenericArray::from_mut_slice(block);
            match self {
                Self::Aes128(enc) => enc.encrypt_block_mut(block),
                Self::Aes256(enc) => enc.encrypt_block_mut(block),
            }
        }
    }
}

/// Incremental CBC decryptor, the inverse of [`CbcEncryptor`].
enum CbcDecryptor {
    Aes128(Aes128CbcDec),
    Aes256(Aes256CbcDec),
}

impl CbcDecryptor {
    fn new(algorithm: CipherAlgorithm, key: &CipherKey, iv: &[u8]) -> Result<Self> {
        match algorithm {
            CipherAlgorithm::Aes128Cbc => Aes128CbcDec::new_from_slices(key.as_bytes(), iv)
                .map(Self::Aes128)
                .map_err(|e| Error::Crypto(format!("Cipher setup failed: {}", e))),
            CipherAlgorithm::Aes256Cbc => Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
                .map(Self::Aes256)
                .map_err(|e| Error::Crypto(format!("Cipher setup failed: {}", e))),
        }
    }

    /// Decrypt `data` in place. The length must be a multiple of
    /// [`BLOCK_SIZE`].
    fn decrypt_blocks(&mut self, data: &mut [u8]) {
        for block in data.chunks_exact_mut(BLOCK_SIZE) {
            let block = GenericArray::from_mut_slice(block);
            match self {
                Self::Aes128(dec) => dec.decrypt_block_mut(block),
                Self::Aes256(dec) => dec.decrypt_block_mut(block),
            }
        }
    }
}

/// `AsyncRead` adapter that encrypts the bytes of an inner reader.
///
/// Emits ciphertext only; pair it with [`IvInjector`] to prepend the IV.
/// Partial blocks carry across reads, and source EOF triggers the final
/// PKCS#7 padding block, so output length is always a block multiple.
pub struct EncryptingStream<R> {
    inner: R,
    cipher: CbcEncryptor,
    /// Plaintext bytes waiting for a full block, always shorter than one
    /// block between polls.
    pending: Vec<u8>,
    /// Ciphertext ready to hand to the caller.
    ready: Vec<u8>,
    finished: bool,
}

impl<R: AsyncRead + Unpin> EncryptingStream<R> {
    /// Wrap `source`, encrypting its bytes under `key` with `iv`.
    ///
    /// # Errors
    /// - Returns `Error::Crypto` if the key length does not fit the
    ///   algorithm
    pub fn new(
        source: R,
        algorithm: CipherAlgorithm,
        key: &CipherKey,
        iv: &[u8; IV_LENGTH],
    ) -> Result<Self> {
        Ok(Self {
            inner: source,
            cipher: CbcEncryptor::new(algorithm, key, iv)?,
            pending: Vec::new(),
            ready: Vec::new(),
            finished: false,
        })
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for EncryptingStream<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();

        loop {
            if !this.ready.is_empty() {
                let n = this.ready.len().min(buf.remaining());
                buf.put_slice(&this.ready[..n]);
                this.ready.drain(..n);
                return Poll::Ready(Ok(()));
            }
            if this.finished {
                return Poll::Ready(Ok(()));
            }

            let mut chunk = [0u8; READ_CHUNK];
            let mut read_buf = ReadBuf::new(&mut chunk);
            match Pin::new(&mut this.inner).poll_read(cx, &mut read_buf) {
                Poll::Ready(Ok(())) => {
                    let data = read_buf.filled();
                    if data.is_empty() {
                        // Source EOF: pad the carried bytes into the final
                        // block. PKCS#7 always emits one, even for an empty
                        // source.
                        let mut block = [0u8; BLOCK_SIZE];
                        let pos = this.pending.len();
                        block[..pos].copy_from_slice(&this.pending);
                        Pkcs7::raw_pad(&mut block, pos);
                        this.cipher.encrypt_blocks(&mut block);
                        this.ready.extend_from_slice(&block);
                        this.pending.clear();
                        this.finished = true;
                    } else {
                        this.pending.extend_from_slice(data);
                        let full = this.pending.len() - this.pending.len() % BLOCK_SIZE;
                        if full > 0 {
                            this.cipher.encrypt_blocks(&mut this.pending[..full]);
                            this.ready.extend_from_slice(&this.pending[..full]);
                            this.pending.drain(..full);
                        }
                    }
                }
                Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// `AsyncRead` adapter that decrypts the bytes of an inner reader.
///
/// Expects raw ciphertext; the caller strips the leading IV first. The most
/// recently decrypted block is held back until the next block arrives, so
/// padding can be removed from the true final block at EOF.
pub struct DecryptingStream<R> {
    inner: R,
    cipher: CbcDecryptor,
    /// Ciphertext bytes waiting for a full block.
    pending: Vec<u8>,
    /// Last decrypted block, withheld until EOF proves or disproves it
    /// final.
    held: Option<[u8; BLOCK_SIZE]>,
    /// Plaintext ready to hand to the caller.
    ready: Vec<u8>,
    finished: bool,
}

impl<R: AsyncRead + Unpin> DecryptingStream<R> {
    /// Wrap `source`, decrypting its bytes under `key` with `iv`.
    ///
    /// # Errors
    /// - Returns `Error::Crypto` if the key length does not fit the
    ///   algorithm
    pub fn new(
        source: R,
        algorithm: CipherAlgorithm,
        key: &CipherKey,
        iv: &[u8; IV_LENGTH],
    ) -> Result<Self> {
        Ok(Self {
            inner: source,
            cipher: CbcDecryptor::new(algorithm, key, iv)?,
            pending: Vec::new(),
            held: None,
            ready: Vec::new(),
            finished: false,
        })
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for DecryptingStream<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();

        loop {
            if !this.ready.is_empty() {
                let n = this.ready.len().min(buf.remaining());
                buf.put_slice(&this.ready[..n]);
                this.ready.drain(..n);
                return Poll::Ready(Ok(()));
            }
            if this.finished {
                return Poll::Ready(Ok(()));
            }

            let mut chunk = [0u8; READ_CHUNK];
            let mut read_buf = ReadBuf::new(&mut chunk);
            match Pin::new(&mut this.inner).poll_read(cx, &mut read_buf) {
                Poll::Ready(Ok(())) => {
                    let data = read_buf.filled();
                    if data.is_empty() {
                        if !this.pending.is_empty() {
                            return Poll::Ready(Err(Error::Decryption(
                                "Ciphertext length is not a multiple of the cipher block size"
                                    .to_string(),
                            )
                            .into()));
                        }
                        let block = match this.held.take() {
                            Some(block) => block,
                            None => {
                                return Poll::Ready(Err(Error::Decryption(
                                    "Ciphertext is empty".to_string(),
                                )
                                .into()));
                            }
                        };
                        let plaintext = Pkcs7::raw_unpad(&block).map_err(|_| {
                            Error::Decryption("Bad padding or corrupted ciphertext".to_string())
                        })?;
                        this.ready.extend_from_slice(plaintext);
                        this.finished = true;
                    } else {
                        this.pending.extend_from_slice(data);
                        let full = this.pending.len() - this.pending.len() % BLOCK_SIZE;
                        if full > 0 {
                            // A newer block supersedes the held one.
                            if let Some(prev) = this.held.take() {
                                this.ready.extend_from_slice(&prev);
                            }
                            this.cipher.decrypt_blocks(&mut this.pending[..full]);
                            this.ready.extend_from_slice(&this.pending[..full - BLOCK_SIZE]);
                            let mut last = [0u8; BLOCK_SIZE];
                            last.copy_from_slice(&this.pending[full - BLOCK_SIZE..full]);
                            this.held = Some(last);
                            this.pending.drain(..full);
                        }
                    }
                }
                Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Encrypt `source` into `dest` using the stream wire format.
///
/// The pipeline is `source -> EncryptingStream -> IvInjector -> dest`,
/// driven with cooperative backpressure; the IV reaches `dest` before any
/// ciphertext byte, regardless of how the source is chunked.
///
/// # Postconditions
/// - Returns the number of bytes written to `dest` (IV plus ciphertext)
///
/// # Errors
/// - Returns `Error::InvalidInput` if the password is empty
/// - Returns `Error::Crypto` if the suite's hash cannot key the suite's
///   cipher
/// - Returns `Error::Io` on source or destination failures
///
/// # Security
/// - No authentication tag is computed or written; the output's integrity
///   is not protected
pub async fn encrypt_stream<R, W>(
    source: R,
    dest: &mut W,
    password: &str,
    suite: &CipherSuite,
) -> Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let key = derive_cipher_key(password, suite)?;
    let iv = generate_iv();

    let encryptor = EncryptingStream::new(source, suite.cipher, &key, &iv)?;
    let mut pipeline = IvInjector::new(encryptor, iv);

    let written = tokio::io::copy(&mut pipeline, dest)
        .await
        .map_err(recover_error)?;
    dest.flush().await?;

    Ok(written)
}

/// Decrypt a stream produced by [`encrypt_stream`] into `dest`.
///
/// Reads exactly 16 IV bytes from `source`, then pipes the remainder
/// through the decryptor.
///
/// # Postconditions
/// - Returns the number of plaintext bytes written to `dest`
///
/// # Errors
/// - Returns `Error::InvalidInput` if the password is empty
/// - Returns `Error::Decryption` if the stream is shorter than one IV, the
///   ciphertext is empty or not block-aligned, or the final padding is
///   invalid
/// - Returns `Error::Io` on source or destination failures
///
/// # Security
/// - There is no integrity gate: a wrong password or a tampered stream can
///   fail late or succeed with garbage, possibly after plaintext has been
///   written to `dest`. Discard the destination on any failure.
pub async fn decrypt_stream<R, W>(
    mut source: R,
    dest: &mut W,
    password: &str,
    suite: &CipherSuite,
) -> Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let key = derive_cipher_key(password, suite)?;

    let mut iv = [0u8; IV_LENGTH];
    source.read_exact(&mut iv).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Decryption("Stream is shorter than one initialization vector".to_string())
        } else {
            Error::Io(e)
        }
    })?;

    let mut decryptor = DecryptingStream::new(source, suite.cipher, &key, &iv)?;

    let written = tokio::io::copy(&mut decryptor, dest)
        .await
        .map_err(recover_error)?;
    dest.flush().await?;

    Ok(written)
}

/// Encrypt the file at `source` into a new file at `dest`.
///
/// # Errors
/// - Returns `Error::Io` if `source` cannot be read or `dest` cannot be
///   written, and the errors of [`encrypt_stream`] otherwise
pub async fn encrypt_file(
    source: &Path,
    dest: &Path,
    password: &str,
    suite: &CipherSuite,
) -> Result<u64> {
    debug!(source = %source.display(), dest = %dest.display(), suite = %suite, "Encrypting file");

    let reader = File::open(source).await?;
    let mut writer = File::create(dest).await?;
    let written = encrypt_stream(reader, &mut writer, password, suite).await?;

    info!(dest = %dest.display(), bytes = written, "File encrypted");
    Ok(written)
}

/// Decrypt the file at `source` into a new file at `dest`.
///
/// A partially written `dest` is left in place when decryption fails; the
/// caller decides whether to delete it.
///
/// # Errors
/// - Returns `Error::Io` if `source` cannot be read or `dest` cannot be
///   written, and the errors of [`decrypt_stream`] otherwise
pub async fn decrypt_file(
    source: &Path,
    dest: &Path,
    password: &str,
    suite: &CipherSuite,
) -> Result<u64> {
    debug!(source = %source.display(), dest = %dest.display(), suite = %suite, "Decrypting file");

    let reader = File::open(source).await?;
    let mut writer = File::create(dest).await?;
    let written = decrypt_stream(reader, &mut writer, password, suite).await?;

    info!(dest = %dest.display(), bytes = written, "File decrypted");
    Ok(written)
}

/// Restore a typed error that crossed the `std::io::Error` boundary inside
/// the pipeline.
fn recover_error(err: std::io::Error) -> Error {
    match err.downcast::<Error>() {
        Ok(inner) => inner,
        Err(err) => Error::Io(err),
    }
}
