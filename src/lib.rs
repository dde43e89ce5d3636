#![doc = include_str!("../README.md")]
#![warn(missing_docs, unused_crate_dependencies)]

// Used by the `md5` binary only
use clap as _;
use tracing_subscriber as _;

// Used by benches and integration tests only
#[cfg(test)]
use criterion as _;
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use reference_md5 as _;
#[cfg(test)]
use tempfile as _;

mod buffer;
mod error;

pub mod compress;
pub mod constants;
pub mod digest;
pub mod padding;

/// Module containing the incremental digest context
pub mod hasher;

/// Module containing reader and file loaders
pub mod io;

#[cfg(feature = "parallel")]
pub mod batch;

pub use compress::{compress_block, fold, Block, State};
pub use digest::{assemble, Digest};
pub use error::{Md5Error, Md5Result};
pub use hasher::Md5;
pub use io::{digest_async_reader, digest_file, digest_reader, HashingReader};
pub use padding::{pad, padded_len, PaddedBuffer};

#[cfg(feature = "parallel")]
pub use batch::{digest_batch, digest_files};

/// Computes the digest of the provided message by padding it into whole
/// blocks, folding every block into the initial state and assembling the
/// final state words.
///
/// Fails only if the message is longer than 2^61 bytes.
///
/// ```
/// let digest = md5_engine::hash(b"abc").unwrap();
/// assert_eq!(digest.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
/// ```
pub fn hash(message: &[u8]) -> Md5Result<Digest> {
    let padded = pad(message)?;
    Ok(assemble(fold(State::INITIAL, padded.blocks())))
}

/// Computes the digest of the provided data without copying it into a
/// padded buffer. Equal to [`hash`] for every message within the length
/// limit.
pub fn compute<T: AsRef<[u8]>>(data: T) -> Digest {
    let mut hasher = Md5::new();
    hasher.update(data.as_ref());
    hasher.finalize_wrapping()
}
