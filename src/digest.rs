//! The finished 16 byte digest and its hex presentation.

use crate::{
    compress::State,
    constants::DIGEST_LEN,
    error::{Md5Error, Md5Result},
};
use std::{fmt, str::FromStr};

/// A finished MD5 digest, the raw 16 output bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub [u8; DIGEST_LEN]);

/// Serializes the final state words into a digest. Each word is written
/// least significant byte first in A, B, C, D order.
pub fn assemble(state: State) -> Digest {
    let mut out = [0u8; DIGEST_LEN];
    for (bytes, word) in out.chunks_exact_mut(4).zip(state.words()) {
        bytes.copy_from_slice(&word.to_le_bytes());
    }
    Digest(out)
}

impl Digest {
    /// The raw digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex form, two digits per byte
    pub fn to_hex(&self) -> String {
        format!("{self:x}")
    }
}

impl From<Digest> for [u8; DIGEST_LEN] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

macro_rules! impl_hex {
    ($kind:ident, $format:literal) => {
        impl fmt::$kind for Digest {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for byte in &self.0 {
                    write!(f, $format, byte)?;
                }
                Ok(())
            }
        }
    };
}

impl_hex!(LowerHex, "{:02x}");
impl_hex!(UpperHex, "{:02X}");

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self:x})")
    }
}

impl FromStr for Digest {
    type Err = Md5Error;

    /// Parses 32 hex digits of either case
    fn from_str(value: &str) -> Md5Result<Self> {
        let value = value.as_bytes();
        if value.len() != DIGEST_LEN * 2 {
            return Err(Md5Error::InvalidHexLength { len: value.len() });
        }

        let mut out = [0u8; DIGEST_LEN];
        for (index, pair) in value.chunks_exact(2).enumerate() {
            let high = hex_value(pair[0]).ok_or(Md5Error::InvalidHexDigit { index: index * 2 })?;
            let low =
                hex_value(pair[1]).ok_or(Md5Error::InvalidHexDigit { index: index * 2 + 1 })?;
            out[index] = (high << 4) | low;
        }
        Ok(Digest(out))
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bytes below 0x10 keep their leading zero
    #[test]
    fn hex_is_zero_padded() {
        let mut bytes = [0u8; DIGEST_LEN];
        bytes[0] = 0x01;
        bytes[15] = 0x0f;
        let hex = Digest(bytes).to_hex();
        assert_eq!(hex.len(), 32);
        assert_eq!(hex, "0100000000000000000000000000000f");
    }

    #[test]
    fn upper_hex() {
        let digest = Digest([0xab; DIGEST_LEN]);
        assert_eq!(format!("{digest:X}"), "AB".repeat(16));
    }

    #[test]
    fn assemble_is_little_endian() {
        let state = State::from_words([0x04030201, 0x08070605, 0x0c0b0a09, 0x100f0e0d]);
        let digest = assemble(state);
        let expected: Vec<u8> = (1..=16).collect();
        assert_eq!(digest.as_bytes().as_slice(), expected.as_slice());
    }

    #[test]
    fn parse_round_trip() {
        let digest: Digest = "900150983CD24FB0d6963f7d28e17f72".parse().unwrap();
        assert_eq!(digest.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            "abc".parse::<Digest>(),
            Err(Md5Error::InvalidHexLength { len: 3 })
        ));
        assert!(matches!(
            "900150983cd24fb0d6963f7d28e17fzz".parse::<Digest>(),
            Err(Md5Error::InvalidHexDigit { index: 30 })
        ));
    }
}
