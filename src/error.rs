use std::io;
use thiserror::Error;

/// Errors produced while digesting a message or parsing a digest
#[derive(Debug, Error)]
pub enum Md5Error {
    /// The message is longer than the 2^61 bytes whose bit length
    /// still fits the 64-bit length field
    #[error("input of {len} bytes exceeds the MD5 length limit")]
    InputTooLarge {
        /// Total number of bytes that were supplied
        len: u64,
    },
    /// A hex digest string did not contain exactly 32 digits
    #[error("expected 32 hex digits but got {len}")]
    InvalidHexLength {
        /// Length of the rejected string
        len: usize,
    },
    /// A hex digest string contained a character that isn't a hex digit
    #[error("invalid hex digit at index {index}")]
    InvalidHexDigit {
        /// Byte index of the offending character
        index: usize,
    },
    /// IO failure reported by the reader or file the message came from
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type used throughout the crate
pub type Md5Result<T> = Result<T, Md5Error>;
