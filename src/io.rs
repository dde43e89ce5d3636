use crate::{digest::Digest, error::Md5Result, hasher::Md5};
use std::{
    io::{self, ErrorKind, Read},
    path::Path,
    pin::Pin,
    task::{ready, Context, Poll},
};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tracing::debug;

/// Size of the chunks read from the underlying source
const READ_CHUNK_LEN: usize = 8 * 1024;

/// Reads the provided reader to the end returning the digest of
/// everything that was read
pub fn digest_reader<R: Read>(mut reader: R) -> Md5Result<Digest> {
    let mut hasher = Md5::new();
    let mut chunk = [0u8; READ_CHUNK_LEN];
    loop {
        let count = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(count) => count,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        hasher.update(&chunk[..count]);
    }
    hasher.finalize()
}

/// Reads the provided async reader to the end returning the digest
/// of everything that was read
pub async fn digest_async_reader<R>(mut reader: R) -> Md5Result<Digest>
where
    R: AsyncRead + Unpin,
{
    let mut hasher = Md5::new();
    let mut chunk = vec![0u8; READ_CHUNK_LEN];
    loop {
        let count = reader.read(&mut chunk).await?;
        if count == 0 {
            break;
        }
        hasher.update(&chunk[..count]);
    }
    hasher.finalize()
}

/// Opens the file at the provided path and digests its contents
///
/// `path` The path of the file to digest
pub async fn digest_file<P: AsRef<Path>>(path: P) -> Md5Result<Digest> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path).await?;
    let digest = digest_async_reader(file).await?;
    debug!(path = %path.display(), %digest, "digested file");
    Ok(digest)
}

/// Wrapping structure for an [`AsyncRead`] that hashes every byte read
/// through it, leaving the data itself untouched for the caller.
pub struct HashingReader<R> {
    /// Underlying read source
    inner: R,
    /// Digest of everything read so far
    hasher: Md5,
}

impl<R> HashingReader<R> {
    /// Wraps the provided reader
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Md5::new(),
        }
    }

    /// Returns a reference to the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Number of bytes read through the wrapper
    pub fn bytes_read(&self) -> u64 {
        self.hasher.len()
    }

    /// Digest of everything read so far. Reading may continue afterwards.
    pub fn digest(&self) -> Md5Result<Digest> {
        self.hasher.clone().finalize()
    }

    /// Returns the underlying reader along with the running context
    pub fn into_parts(self) -> (R, Md5) {
        (self.inner, self.hasher)
    }
}

impl<R> AsyncRead for HashingReader<R>
where
    R: AsyncRead + Unpin,
{
    /// Reads from the inner reader and hashes only the newly filled bytes
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        ready!(Pin::new(&mut this.inner).poll_read(cx, buf))?;
        this.hasher.update(&buf.filled()[before..]);
        Poll::Ready(Ok(()))
    }
}
