//! DER length field.
//!
//! Lengths below 128 use the short form (a single octet). Larger lengths use the long form:
//! `0x80 | n` followed by `n` big-endian octets without leading zeros.

use crate::{DecodeError, EncodingError};

/// Utility namespace for the length field.
pub struct Length;

impl Length {
    /// Maximum number of octets following the `0x80 | n` octet.
    pub const MAX_LENGTH_OCTETS: usize = 4;

    const LONG_FORM: u8 = 0x80;

    /// Number of octets the length field for `len` occupies.
    pub fn encoded_len(len: usize) -> Result<usize, EncodingError> {
        if len < 0x80 {
            Ok(1)
        } else {
            Ok(1 + Self::significant_octets(len)?)
        }
    }

    /// Appends the length field for `len` to `writer` and returns the number of written octets.
    pub fn serialize(len: usize, writer: &mut Vec<u8>) -> Result<usize, EncodingError> {
        if len < 0x80 {
            writer.push(len as u8);
            return Ok(1);
        }

        let count = Self::significant_octets(len)?;
        writer.push(Self::LONG_FORM | count as u8);
        let be = (len as u64).to_be_bytes();
        writer.extend_from_slice(&be[be.len() - count..]);

        Ok(1 + count)
    }

    /// Reads a length field at the start of `input`.
    ///
    /// Returns the length value and the number of consumed octets. `offset` is only used
    /// for error reporting.
    pub fn deserialize(input: &[u8], offset: usize) -> Result<(usize, usize), DecodeError> {
        let first = *input.first().ok_or(DecodeError::UnexpectedEof { offset })?;

        if first < Self::LONG_FORM {
            return Ok((first as usize, 1));
        }

        let count = (first & !Self::LONG_FORM) as usize;
        if count == 0 {
            return Err(DecodeError::IndefiniteLength { offset });
        }
        if count > Self::MAX_LENGTH_OCTETS {
            return Err(DecodeError::LengthOverflow { offset });
        }

        let octets = input.get(1..=count).ok_or(DecodeError::UnexpectedEof { offset })?;
        if octets[0] == 0 {
            return Err(DecodeError::NonMinimalLength { offset });
        }

        let len = octets.iter().fold(0usize, |acc, octet| (acc << 8) | *octet as usize);
        if len < 0x80 {
            return Err(DecodeError::NonMinimalLength { offset });
        }

        Ok((len, 1 + count))
    }

    fn significant_octets(len: usize) -> Result<usize, EncodingError> {
        let bits = usize::BITS - len.leading_zeros();
        let count = ((bits + 7) / 8) as usize;

        if count > Self::MAX_LENGTH_OCTETS {
            return Err(EncodingError::LengthOverflow {
                len,
                max_octets: Self::MAX_LENGTH_OCTETS,
            });
        }

        Ok(count)
    }
}
