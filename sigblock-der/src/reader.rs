//! Structural TLV reader.
//!
//! This is not a parser for ASN.1 types: it walks identifier/length/value triples so callers can
//! locate a field by position inside an encoded structure and copy it verbatim.

use crate::length::Length;
use crate::tag::Tag;
use crate::DecodeError;

/// One encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tag: Tag,
    /// Content octets.
    pub value: &'a [u8],
    /// Identifier, length field and content octets.
    pub raw: &'a [u8],
    /// Offset of the identifier octet relative to the outermost input.
    pub offset: usize,
}

impl<'a> Tlv<'a> {
    /// Reader over the content octets of this value.
    pub fn reader(&self) -> DerReader<'a> {
        let header_len = self.raw.len() - self.value.len();
        DerReader::with_base_offset(self.value, self.offset + header_len)
    }
}

/// Sequential reader over concatenated TLVs.
#[derive(Debug, Clone)]
pub struct DerReader<'a> {
    input: &'a [u8],
    pos: usize,
    base_offset: usize,
}

impl<'a> DerReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_base_offset(input, 0)
    }

    fn with_base_offset(input: &'a [u8], base_offset: usize) -> Self {
        Self {
            input,
            pos: 0,
            base_offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Offset of the next value relative to the outermost input.
    pub fn offset(&self) -> usize {
        self.base_offset + self.pos
    }

    /// Identifier of the next value, without consuming it.
    pub fn peek_tag(&self) -> Option<Tag> {
        self.input.get(self.pos).copied().map(Tag::from)
    }

    /// Reads the next value whatever its identifier.
    pub fn read_tlv(&mut self) -> Result<Tlv<'a>, DecodeError> {
        let offset = self.offset();
        let rest = &self.input[self.pos..];

        let identifier = *rest.first().ok_or(DecodeError::UnexpectedEof { offset })?;
        if identifier & 0x1F == 0x1F {
            return Err(DecodeError::MultiOctetTag { offset });
        }

        let (len, len_octets) = Length::deserialize(&rest[1..], offset + 1)?;
        let header_len = 1 + len_octets;
        let total_len = header_len
            .checked_add(len)
            .ok_or(DecodeError::LengthOverflow { offset })?;

        let raw = rest.get(..total_len).ok_or(DecodeError::UnexpectedEof { offset })?;
        self.pos += total_len;

        Ok(Tlv {
            tag: Tag::from(identifier),
            value: &raw[header_len..],
            raw,
            offset,
        })
    }

    /// Reads the next value and checks its identifier.
    pub fn read_expected(&mut self, expected: Tag) -> Result<Tlv<'a>, DecodeError> {
        let offset = self.offset();
        match self.peek_tag() {
            Some(found) if found != expected => Err(DecodeError::UnexpectedTag {
                expected,
                found,
                offset,
            }),
            _ => self.read_tlv(),
        }
    }

    /// Reads the next value only if its identifier matches.
    pub fn read_optional(&mut self, tag: Tag) -> Result<Option<Tlv<'a>>, DecodeError> {
        if self.peek_tag() == Some(tag) {
            self.read_tlv().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Fails if anything is left to read.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingData {
                len: self.input.len() - self.pos,
            })
        }
    }

    /// Walks every value recursively, descending into constructed ones, and fails on the first
    /// malformed or trailing byte.
    pub fn validate_all(mut self) -> Result<usize, DecodeError> {
        let mut count = 0;
        while !self.is_empty() {
            let tlv = self.read_tlv()?;
            count += 1;
            if tlv.tag.is_constructed() {
                count += tlv.reader().validate_all()?;
            }
        }
        Ok(count)
    }
}
