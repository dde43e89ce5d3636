//! The block compression function and the fold that carries the state
//! words from one block to the next.

use crate::constants::{BLOCK_LEN, INITIAL_STATE, SHIFTS, SINES};

/// A single 64 byte input block
pub type Block = [u8; BLOCK_LEN];

/// The four chaining words carried between blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    /// Word A
    pub a: u32,
    /// Word B
    pub b: u32,
    /// Word C
    pub c: u32,
    /// Word D
    pub d: u32,
}

impl State {
    /// State every digest computation starts from
    pub const INITIAL: Self = Self::from_words(INITIAL_STATE);

    /// Creates a state from the words in A, B, C, D order
    pub const fn from_words([a, b, c, d]: [u32; 4]) -> Self {
        Self { a, b, c, d }
    }

    /// Returns the words in A, B, C, D order
    pub const fn words(&self) -> [u32; 4] {
        [self.a, self.b, self.c, self.d]
    }
}

impl Default for State {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Reads the block as sixteen little-endian words
fn read_words(block: &Block) -> [u32; 16] {
    let mut words = [0u32; 16];
    for (word, bytes) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    words
}

/// Mixes one block into the provided state
///
/// # Arguments
/// * state - The chaining state, updated in place
/// * block - The block to mix in
pub fn compress_block(state: &mut State, block: &Block) {
    let m = read_words(block);
    let [mut a, mut b, mut c, mut d] = state.words();

    for j in 0..64 {
        let (f, g) = match j {
            0..=15 => ((b & c) | (!b & d), j),
            16..=31 => ((b & d) | (c & !d), (5 * j + 1) % 16),
            32..=47 => (b ^ c ^ d, (3 * j + 5) % 16),
            _ => (c ^ (b | !d), (7 * j) % 16),
        };

        let f = f.wrapping_add(a).wrapping_add(SINES[j]).wrapping_add(m[g]);
        a = d;
        d = c;
        c = b;
        b = b.wrapping_add(f.rotate_left(SHIFTS[j]));
    }

    state.a = state.a.wrapping_add(a);
    state.b = state.b.wrapping_add(b);
    state.c = state.c.wrapping_add(c);
    state.d = state.d.wrapping_add(d);
}

/// Folds every block into `state` in order, returning the final state
pub fn fold<'a, I>(state: State, blocks: I) -> State
where
    I: IntoIterator<Item = &'a Block>,
{
    blocks.into_iter().fold(state, |mut state, block| {
        compress_block(&mut state, block);
        state
    })
}
