use crate::tag::Tag;
use thiserror::Error;

/// Errors raised while building or encoding DER values.
///
/// These are invariant violations of the caller: retrying with the same input will fail again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// tag number doesn't fit in a single identifier octet
    #[error("tag number {number} is out of the supported range (0..=30)")]
    TagNumberOutOfRange { number: u8 },

    /// length can't be represented by the length field
    #[error("length {len} can't be represented with at most {max_octets} length octets")]
    LengthOverflow { len: usize, max_octets: usize },

    /// object identifier arcs violate X.690 rules
    #[error("invalid object identifier: {reason}")]
    InvalidObjectIdentifier { reason: &'static str },
}

/// Errors raised by [`DerReader`](crate::DerReader) while walking encoded values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// input ended in the middle of a value
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// indefinite length form is BER-only
    #[error("indefinite length at offset {offset} is not allowed in DER")]
    IndefiniteLength { offset: usize },

    /// length encoded with more octets than needed
    #[error("non-minimal length encoding at offset {offset}")]
    NonMinimalLength { offset: usize },

    /// length field exceeds what this reader supports
    #[error("length field at offset {offset} is too large")]
    LengthOverflow { offset: usize },

    /// high tag number form is not supported
    #[error("multi-octet tag at offset {offset} is not supported")]
    MultiOctetTag { offset: usize },

    /// a different value was found at this position
    #[error("expected {expected}, found {found} at offset {offset}")]
    UnexpectedTag { expected: Tag, found: Tag, offset: usize },

    /// bytes left after the last expected value
    #[error("{len} trailing byte(s) after the last value")]
    TrailingData { len: usize },
}
