//! Message padding.
//!
//! The message is followed by a single `1` bit (the byte `0x80`), zero
//! filled until eight bytes short of a block boundary and closed with the
//! message length in bits as a little-endian `u64`.

use crate::{
    compress::Block,
    constants::{BLOCK_LEN, LENGTH_FIELD_LEN, MAX_MESSAGE_LEN},
    error::{Md5Error, Md5Result},
};

/// Byte that carries the terminating `1` bit
pub(crate) const TERMINATOR: u8 = 0x80;

/// Message bytes that still fit in the final block alongside the length field
pub(crate) const LAST_BLOCK_CAPACITY: usize = BLOCK_LEN - LENGTH_FIELD_LEN;

/// Owned copy of a message with padding applied. Its length is always a
/// positive multiple of [`BLOCK_LEN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedBuffer {
    bytes: Vec<u8>,
}

impl PaddedBuffer {
    /// The padded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total padded length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false, a padded buffer holds at least one block
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of 64 byte blocks in the buffer
    pub fn block_count(&self) -> usize {
        self.bytes.len() / BLOCK_LEN
    }

    /// Iterates the buffer as 64 byte blocks in message order
    pub fn blocks(&self) -> impl ExactSizeIterator<Item = &Block> + '_ {
        self.bytes.chunks_exact(BLOCK_LEN).map(|chunk| {
            // chunks_exact only yields full blocks
            <&Block>::try_from(chunk).unwrap_or_else(|_| unreachable!())
        })
    }

    /// The bit length stored in the trailing length field
    pub fn encoded_bit_len(&self) -> u64 {
        let mut field = [0u8; LENGTH_FIELD_LEN];
        field.copy_from_slice(&self.bytes[self.bytes.len() - LENGTH_FIELD_LEN..]);
        u64::from_le_bytes(field)
    }

    /// Consumes the buffer returning the padded bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

/// Returns the padded length for a message of `len` bytes:
/// the smallest multiple of 64 that is at least `len + 9`. Fails with
/// [`Md5Error::InputTooLarge`] past [`MAX_MESSAGE_LEN`].
pub fn padded_len(len: u64) -> Md5Result<u64> {
    check_len(len)?;
    Ok((len + 1 + LENGTH_FIELD_LEN as u64).div_ceil(BLOCK_LEN as u64) * BLOCK_LEN as u64)
}

/// Ensures a message of `len` bytes is within [`MAX_MESSAGE_LEN`]. The
/// length field keeps the bit length modulo 2^64.
pub(crate) fn check_len(len: u64) -> Md5Result<()> {
    if len > MAX_MESSAGE_LEN {
        return Err(Md5Error::InputTooLarge { len });
    }
    Ok(())
}

/// Pads the provided message into a sequence of whole blocks
///
/// # Arguments
/// * message - The message to pad
pub fn pad(message: &[u8]) -> Md5Result<PaddedBuffer> {
    let len = message.len() as u64;
    let total = padded_len(len)? as usize;
    let mut bytes = Vec::with_capacity(total);
    bytes.extend_from_slice(message);
    bytes.push(TERMINATOR);
    bytes.resize(total - LENGTH_FIELD_LEN, 0);
    bytes.extend_from_slice(&len.wrapping_mul(8).to_le_bytes());

    debug_assert_eq!(bytes.len() % BLOCK_LEN, 0);
    Ok(PaddedBuffer { bytes })
}
