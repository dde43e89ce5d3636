use crate::{
    compress::Block,
    constants::{BLOCK_LEN, LENGTH_FIELD_LEN},
    padding::{LAST_BLOCK_CAPACITY, TERMINATOR},
};

/// Buffer for collecting input into whole blocks. Full blocks are handed
/// to a callback as soon as they are available, only the trailing partial
/// block is kept.
#[derive(Clone)]
pub struct BlockBuffer {
    /// The partial block contents
    buffer: Block,
    /// The number of bytes of `buffer` that are in use
    cursor: usize,
}

impl BlockBuffer {
    /// Creates a new empty buffer
    pub const fn new() -> Self {
        Self {
            buffer: [0u8; BLOCK_LEN],
            cursor: 0,
        }
    }

    /// Number of bytes waiting for a full block
    pub fn pending(&self) -> usize {
        self.cursor
    }

    /// Appends the provided input calling `func` with every block that
    /// becomes complete. Blocks fully contained in `input` are passed
    /// through without being copied into the buffer.
    pub fn input<F: FnMut(&Block)>(&mut self, mut input: &[u8], mut func: F) {
        if self.cursor != 0 {
            let remaining = BLOCK_LEN - self.cursor;
            if input.len() < remaining {
                self.buffer[self.cursor..self.cursor + input.len()].copy_from_slice(input);
                self.cursor += input.len();
                return;
            }

            let (head, rest) = input.split_at(remaining);
            self.buffer[self.cursor..].copy_from_slice(head);
            self.cursor = 0;
            func(&self.buffer);
            input = rest;
        }

        let mut chunks = input.chunks_exact(BLOCK_LEN);
        for chunk in &mut chunks {
            if let Ok(block) = <&Block>::try_from(chunk) {
                func(block);
            }
        }

        let tail = chunks.remainder();
        self.buffer[..tail.len()].copy_from_slice(tail);
        self.cursor = tail.len();
    }

    /// Discards any pending bytes
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Zero fills the buffer from the cursor up to `idx`
    fn zero_until(&mut self, idx: usize) {
        self.buffer[self.cursor..idx].fill(0);
        self.cursor = idx;
    }

    /// Writes the terminator byte, the zero fill and the provided bit
    /// length, calling `func` with the one or two blocks this produces.
    /// The buffer is empty afterwards.
    pub fn finish<F: FnMut(&Block)>(&mut self, bit_len: u64, mut func: F) {
        self.buffer[self.cursor] = TERMINATOR;
        self.cursor += 1;

        // No room left for the length field, spill into another block
        if self.cursor > LAST_BLOCK_CAPACITY {
            self.zero_until(BLOCK_LEN);
            func(&self.buffer);
            self.cursor = 0;
        }

        self.zero_until(LAST_BLOCK_CAPACITY);
        self.buffer[LAST_BLOCK_CAPACITY..].copy_from_slice(&bit_len.to_le_bytes());
        debug_assert_eq!(LAST_BLOCK_CAPACITY + LENGTH_FIELD_LEN, BLOCK_LEN);
        func(&self.buffer);
        self.cursor = 0;
    }
}

impl Default for BlockBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding::pad;

    fn collect(buffer: &mut BlockBuffer, input: &[u8], out: &mut Vec<u8>) {
        buffer.input(input, |block| out.extend_from_slice(block));
    }

    #[test]
    fn keeps_partial_block() {
        let mut buffer = BlockBuffer::new();
        let mut out = Vec::new();
        collect(&mut buffer, &[1u8; 10], &mut out);
        assert!(out.is_empty());
        assert_eq!(buffer.pending(), 10);

        collect(&mut buffer, &[2u8; 60], &mut out);
        assert_eq!(out.len(), 64);
        assert_eq!(buffer.pending(), 6);
        assert_eq!(&out[..10], &[1u8; 10]);
        assert_eq!(&out[10..], &[2u8; 54]);
    }

    #[test]
    fn passes_whole_blocks_through() {
        let mut buffer = BlockBuffer::new();
        let mut out = Vec::new();
        collect(&mut buffer, &[3u8; 128], &mut out);
        assert_eq!(out.len(), 128);
        assert_eq!(buffer.pending(), 0);
    }

    /// Finishing produces the same blocks as padding the whole message
    #[test]
    fn finish_matches_pad() {
        for len in [0usize, 1, 55, 56, 57, 63, 64, 65, 119, 120, 200] {
            let message: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut buffer = BlockBuffer::new();
            let mut out = Vec::new();
            collect(&mut buffer, &message, &mut out);
            buffer.finish(len as u64 * 8, |block| out.extend_from_slice(block));
            assert_eq!(out, pad(&message).unwrap().into_inner(), "length {len}");
            assert_eq!(buffer.pending(), 0);
        }
    }
}
