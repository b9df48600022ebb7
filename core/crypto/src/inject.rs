//! Pipeline stage that prepends an initialization vector to a byte stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

use crate::cipher::IV_LENGTH;

/// `AsyncRead` adapter that yields a fixed IV ahead of the inner reader's
/// bytes.
///
/// The IV is emitted exactly once per instance, before the first byte of the
/// inner reader, even when the inner reader is empty. The emission state is
/// owned by the instance, so concurrent pipelines never observe each other.
/// Nothing is buffered beyond the caller's read buffer.
pub struct IvInjector<R> {
    inner: R,
    iv: [u8; IV_LENGTH],
    emitted: usize,
}

impl<R> IvInjector<R> {
    /// Wrap `inner`, scheduling `iv` ahead of its bytes.
    pub fn new(inner: R, iv: [u8; IV_LENGTH]) -> Self {
        Self {
            inner,
            iv,
            emitted: 0,
        }
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for IvInjector<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();

        if this.emitted < IV_LENGTH {
            let n = (IV_LENGTH - this.emitted).min(buf.remaining());
            buf.put_slice(&this.iv[this.emitted..this.emitted + n]);
            this.emitted += n;
            return Poll::Ready(Ok(()));
        }

        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}
