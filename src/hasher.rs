use crate::{
    buffer::BlockBuffer,
    compress::{compress_block, State},
    digest::{assemble, Digest},
    error::{Md5Error, Md5Result},
    padding::check_len,
};
use bytes::Buf;
use std::{fmt, io};
use tracing::trace;

/// Running MD5 computation. Input can be provided in any number of
/// pieces, the digest is identical to hashing the concatenation at once.
///
/// ```
/// use md5_engine::Md5;
///
/// let mut hasher = Md5::new();
/// hasher.update(b"message ");
/// hasher.update(b"digest");
/// let digest = hasher.finalize().unwrap();
/// assert_eq!(digest.to_hex(), "f96b697d7cb7938d525a2f31aaf161d0");
/// ```
#[derive(Clone, Default)]
pub struct Md5 {
    /// Total number of message bytes, modulo 2^64
    length_bytes: u64,
    /// Whether the total has gone past the length field limit
    too_large: bool,
    /// Partial block waiting for more input
    buffer: BlockBuffer,
    /// Chaining state after every complete block so far
    state: State,
}

impl Md5 {
    /// Creates a new context starting from the initial state
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds more message bytes into the computation
    pub fn update(&mut self, input: &[u8]) {
        match self.length_bytes.checked_add(input.len() as u64) {
            Some(total) => {
                self.too_large |= check_len(total).is_err();
                self.length_bytes = total;
            }
            None => {
                self.too_large = true;
                self.length_bytes = self.length_bytes.wrapping_add(input.len() as u64);
            }
        }

        let state = &mut self.state;
        self.buffer.input(input, |block| compress_block(state, block));
    }

    /// Feeds every remaining chunk of the provided buffer
    pub fn update_buf<B: Buf>(&mut self, mut buf: B) {
        while buf.has_remaining() {
            let chunk = buf.chunk();
            let len = chunk.len();
            self.update(chunk);
            buf.advance(len);
        }
    }

    /// Number of message bytes consumed so far, modulo 2^64
    pub fn len(&self) -> u64 {
        self.length_bytes
    }

    /// Whether no message bytes have been consumed yet
    pub fn is_empty(&self) -> bool {
        self.length_bytes == 0 && !self.too_large
    }

    /// Returns the context to its freshly created state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Pads the message and returns the digest. Fails with
    /// [`Md5Error::InputTooLarge`] if more than 2^61 bytes were consumed.
    pub fn finalize(mut self) -> Md5Result<Digest> {
        self.finalize_reset()
    }

    /// Same as [`Md5::finalize`] but leaves the context reset for reuse
    pub fn finalize_reset(&mut self) -> Md5Result<Digest> {
        if self.too_large {
            let len = self.length_bytes;
            self.reset();
            return Err(Md5Error::InputTooLarge { len });
        }
        Ok(self.finalize_wrapping_reset())
    }

    /// Pads the message keeping only the low 64 bits of its bit length
    /// and returns the digest. Never fails.
    pub fn finalize_wrapping(mut self) -> Digest {
        self.finalize_wrapping_reset()
    }

    fn finalize_wrapping_reset(&mut self) -> Digest {
        let bit_len = self.length_bytes.wrapping_mul(8);
        let state = &mut self.state;
        self.buffer.finish(bit_len, |block| compress_block(state, block));

        let digest = assemble(self.state);
        trace!(bytes = self.length_bytes, digest = %digest, "md5 finalized");
        self.reset();
        digest
    }
}

impl fmt::Debug for Md5 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Md5")
            .field("len", &self.length_bytes)
            .field("pending", &self.buffer.pending())
            .field("too_large", &self.too_large)
            .finish()
    }
}

impl io::Write for Md5 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::MAX_MESSAGE_LEN, hash};

    #[test]
    fn split_input_matches_one_shot() {
        let message: Vec<u8> = (0..300u32).map(|i| (i * 7) as u8).collect();
        for split in [0, 1, 55, 56, 63, 64, 65, 128, 299, 300] {
            let mut hasher = Md5::new();
            hasher.update(&message[..split]);
            hasher.update(&message[split..]);
            assert_eq!(hasher.finalize().unwrap(), hash(&message).unwrap(), "split {split}");
        }
    }

    #[test]
    fn update_buf_handles_chained_buffers() {
        let buf = (&b"message "[..]).chain(&b"digest"[..]);
        let mut hasher = Md5::new();
        hasher.update_buf(buf);
        assert_eq!(hasher.len(), 14);
        assert_eq!(
            hasher.finalize().unwrap().to_hex(),
            "f96b697d7cb7938d525a2f31aaf161d0"
        );
    }

    #[test]
    fn finalize_reset_allows_reuse() {
        let mut hasher = Md5::new();
        hasher.update(b"abc");
        let first = hasher.finalize_reset().unwrap();
        assert!(hasher.is_empty());
        hasher.update(b"abc");
        assert_eq!(hasher.finalize().unwrap(), first);
    }

    #[test]
    fn write_impl_feeds_input() {
        use std::io::Write;

        let mut hasher = Md5::new();
        write!(hasher, "abc").unwrap();
        assert_eq!(
            hasher.finalize().unwrap().to_hex(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    /// The limit is tracked from the byte count alone so it can be
    /// exercised without feeding 2^61 bytes
    #[test]
    fn reports_oversized_input() {
        let mut hasher = Md5::new();
        hasher.length_bytes = MAX_MESSAGE_LEN;
        hasher.update(b"x");
        assert!(matches!(
            hasher.clone().finalize(),
            Err(Md5Error::InputTooLarge { len }) if len == MAX_MESSAGE_LEN + 1
        ));
    }

    /// Wrapping finalization encodes the bit length modulo 2^64
    #[test]
    fn wrapping_finalize_truncates_bit_len() {
        let mut hasher = Md5::new();
        hasher.length_bytes = MAX_MESSAGE_LEN;
        hasher.update(b"x");

        let mut expected = hasher.clone();
        let bit_len = (MAX_MESSAGE_LEN + 1).wrapping_mul(8);
        assert_eq!(bit_len, 8);
        let state = &mut expected.state;
        expected
            .buffer
            .finish(bit_len, |block| compress_block(state, block));

        assert_eq!(hasher.finalize_wrapping(), assemble(expected.state));
    }
}
