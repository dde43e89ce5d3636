//! Parallel hashing of independent messages on the rayon thread pool.
//!
//! Each message gets its own context so there is no state shared between
//! the worker threads, only the constant tables.

use crate::{compute, digest::Digest, error::Md5Result, io::digest_reader};
use rayon::prelude::*;
use std::{fs::File, path::Path};
use tracing::debug;

/// Computes the digest of every input in parallel. Digests are returned
/// in the same order as the inputs.
///
/// ```
/// use md5_engine::{compute, digest_batch};
///
/// let inputs = [b"abc".as_slice(), b"", b"message digest"];
/// let digests = digest_batch(&inputs);
/// assert_eq!(digests[0], compute(b"abc"));
/// ```
pub fn digest_batch<T>(inputs: &[T]) -> Vec<Digest>
where
    T: AsRef<[u8]> + Sync,
{
    debug!(count = inputs.len(), "digesting batch");
    inputs
        .par_iter()
        .map(|input| compute(input.as_ref()))
        .collect()
}

/// Digests every file in parallel. Each file's result is reported
/// separately so one unreadable file doesn't fail the others.
pub fn digest_files<P>(paths: &[P]) -> Vec<Md5Result<Digest>>
where
    P: AsRef<Path> + Sync,
{
    debug!(count = paths.len(), "digesting files");
    paths
        .par_iter()
        .map(|path| digest_reader(File::open(path.as_ref())?))
        .collect()
}
