//! DER node tree.
//!
//! Values are assembled as a tree of [`DerNode`] and serialized bottom-up: every node knows the
//! size of its content, so a single pass writes identifier, minimal length and content.

use crate::length::Length;
use crate::oid::ObjectIdentifier;
use crate::tag::{Tag, TagClass};
use crate::EncodingError;

/// A node of an ASN.1 value tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerNode {
    /// Primitive value: identifier and raw content octets.
    Primitive { tag: Tag, content: Vec<u8> },
    /// Constructed value: identifier and ordered children.
    Constructed { tag: Tag, children: Vec<DerNode> },
    /// Already encoded TLV, copied verbatim.
    Raw(Vec<u8>),
}

impl DerNode {
    /// Generic primitive constructor.
    pub fn primitive(class: TagClass, number: u8, content: Vec<u8>) -> Result<Self, EncodingError> {
        Ok(Self::Primitive {
            tag: Tag::new(class, false, number)?,
            content,
        })
    }

    /// Generic constructed constructor.
    pub fn constructed(class: TagClass, number: u8, children: Vec<DerNode>) -> Result<Self, EncodingError> {
        Ok(Self::Constructed {
            tag: Tag::new(class, true, number)?,
            children,
        })
    }

    /// `INTEGER` from a native signed value, minimal two's complement.
    pub fn integer(value: i64) -> Self {
        let be = value.to_be_bytes();

        let mut start = 0;
        while start < be.len() - 1 {
            let redundant_zero = be[start] == 0x00 && be[start + 1] & 0x80 == 0;
            let redundant_ones = be[start] == 0xFF && be[start + 1] & 0x80 != 0;
            if !(redundant_zero || redundant_ones) {
                break;
            }
            start += 1;
        }

        Self::Primitive {
            tag: Tag::INTEGER,
            content: be[start..].to_vec(),
        }
    }

    /// `INTEGER` from unsigned big-endian magnitude bytes.
    ///
    /// Leading zeros are stripped and a single zero is prepended when the high bit is set,
    /// so the value stays positive.
    pub fn unsigned_integer(magnitude: &[u8]) -> Self {
        let first_significant = magnitude.iter().position(|b| *b != 0).unwrap_or(magnitude.len());
        let significant = &magnitude[first_significant..];

        let mut content = Vec::with_capacity(significant.len() + 1);
        match significant.first() {
            None => content.push(0x00),
            Some(msb) if msb & 0x80 != 0 => {
                content.push(0x00);
                content.extend_from_slice(significant);
            }
            Some(_) => content.extend_from_slice(significant),
        }

        Self::Primitive {
            tag: Tag::INTEGER,
            content,
        }
    }

    pub fn octet_string(content: impl Into<Vec<u8>>) -> Self {
        Self::Primitive {
            tag: Tag::OCTET_STRING,
            content: content.into(),
        }
    }

    pub fn null() -> Self {
        Self::Primitive {
            tag: Tag::NULL,
            content: Vec::new(),
        }
    }

    pub fn oid(oid: &ObjectIdentifier) -> Self {
        Self::Primitive {
            tag: Tag::OID,
            content: oid.as_bytes().to_vec(),
        }
    }

    pub fn sequence(children: Vec<DerNode>) -> Self {
        Self::Constructed {
            tag: Tag::SEQUENCE,
            children,
        }
    }

    /// `SET` / `SET OF`.
    ///
    /// Children are emitted in the given order, no sorting by encoded octets is performed.
    pub fn set(children: Vec<DerNode>) -> Self {
        Self::Constructed {
            tag: Tag::SET,
            children,
        }
    }

    /// `[number] EXPLICIT inner`
    pub fn explicit(number: u8, inner: DerNode) -> Result<Self, EncodingError> {
        Ok(Self::Constructed {
            tag: Tag::context_specific_constructed(number)?,
            children: vec![inner],
        })
    }

    /// `[number] IMPLICIT` constructed value, e.g. an implicitly tagged `SET OF`.
    pub fn implicit_constructed(number: u8, children: Vec<DerNode>) -> Result<Self, EncodingError> {
        Ok(Self::Constructed {
            tag: Tag::context_specific_constructed(number)?,
            children,
        })
    }

    /// Pre-encoded TLV, inserted as is.
    pub fn raw(der: impl Into<Vec<u8>>) -> Self {
        Self::Raw(der.into())
    }

    pub fn tag(&self) -> Option<Tag> {
        match self {
            DerNode::Primitive { tag, .. } | DerNode::Constructed { tag, .. } => Some(*tag),
            DerNode::Raw(der) => der.first().copied().map(Tag::from),
        }
    }

    /// Size of the content octets (without identifier and length field).
    pub fn content_len(&self) -> Result<usize, EncodingError> {
        match self {
            DerNode::Primitive { content, .. } => Ok(content.len()),
            DerNode::Constructed { children, .. } => children
                .iter()
                .try_fold(0usize, |acc, child| Ok(acc + child.encoded_len()?)),
            DerNode::Raw(der) => Ok(der.len()),
        }
    }

    /// Size of the full encoding.
    pub fn encoded_len(&self) -> Result<usize, EncodingError> {
        match self {
            DerNode::Raw(der) => Ok(der.len()),
            _ => {
                let content_len = self.content_len()?;
                Ok(1 + Length::encoded_len(content_len)? + content_len)
            }
        }
    }

    /// Serializes the tree into a new buffer.
    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        let mut buf = Vec::with_capacity(self.encoded_len()?);
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Appends the encoding to `buf` and returns the number of written octets.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<usize, EncodingError> {
        match self {
            DerNode::Primitive { tag, content } => {
                log::trace!("encoding {} with {} content octets", tag, content.len());
                buf.push(tag.inner());
                let mut written = 1 + Length::serialize(content.len(), buf)?;
                buf.extend_from_slice(content);
                written += content.len();
                Ok(written)
            }
            DerNode::Constructed { tag, children } => {
                let content_len = self.content_len()?;
                log::trace!("encoding {} with {} children ({} octets)", tag, children.len(), content_len);
                buf.push(tag.inner());
                let mut written = 1 + Length::serialize(content_len, buf)?;
                for child in children {
                    written += child.write_to(buf)?;
                }
                Ok(written)
            }
            DerNode::Raw(der) => {
                buf.extend_from_slice(der);
                Ok(der.len())
            }
        }
    }
}
