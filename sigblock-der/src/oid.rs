//! Object identifiers, kept in their DER content form.

use crate::EncodingError;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// An object identifier stored as DER content octets (no tag, no length).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    content: Cow<'static, [u8]>,
}

impl ObjectIdentifier {
    /// Wraps content octets that are known to be a valid encoding.
    ///
    /// Intended for constant tables. The octets are not checked.
    pub const fn from_static(content: &'static [u8]) -> Self {
        Self {
            content: Cow::Borrowed(content),
        }
    }

    /// Encodes a sequence of arcs.
    pub fn from_arcs(arcs: &[u64]) -> Result<Self, EncodingError> {
        let (first, second, rest) = match arcs {
            [first, second, rest @ ..] => (*first, *second, rest),
            _ => {
                return Err(EncodingError::InvalidObjectIdentifier {
                    reason: "at least two arcs are required",
                })
            }
        };

        if first > 2 {
            return Err(EncodingError::InvalidObjectIdentifier {
                reason: "first arc must be 0, 1 or 2",
            });
        }
        if first < 2 && second >= 40 {
            return Err(EncodingError::InvalidObjectIdentifier {
                reason: "second arc must be below 40 when the first arc is 0 or 1",
            });
        }

        let head = (first * 40)
            .checked_add(second)
            .ok_or(EncodingError::InvalidObjectIdentifier {
                reason: "second arc is too large",
            })?;

        let mut content = Vec::with_capacity(arcs.len() + 4);
        push_base128(head, &mut content);
        for arc in rest {
            push_base128(*arc, &mut content);
        }

        Ok(Self {
            content: Cow::Owned(content),
        })
    }

    /// Content octets, ready to be wrapped in an `OBJECT IDENTIFIER` TLV.
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Decodes the content octets back into arcs.
    pub fn arcs(&self) -> Vec<u64> {
        let mut arcs = Vec::new();
        let mut acc: u64 = 0;

        for octet in self.content.iter() {
            acc = (acc << 7) | u64::from(octet & 0x7F);
            if octet & 0x80 == 0 {
                if arcs.is_empty() {
                    let first = (acc / 40).min(2);
                    arcs.push(first);
                    arcs.push(acc - first * 40);
                } else {
                    arcs.push(acc);
                }
                acc = 0;
            }
        }

        arcs
    }
}

fn push_base128(mut value: u64, out: &mut Vec<u8>) {
    let mut chunk = [0u8; 10];
    let mut idx = chunk.len();

    loop {
        idx -= 1;
        chunk[idx] = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            break;
        }
    }

    let last = chunk.len() - 1;
    for (i, octet) in chunk.iter().enumerate().skip(idx) {
        out.push(if i == last { *octet } else { octet | 0x80 });
    }
}

impl FromStr for ObjectIdentifier {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|arc| arc.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| EncodingError::InvalidObjectIdentifier {
                reason: "arcs must be unsigned decimal integers",
            })?;

        Self::from_arcs(&arcs)
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let arcs = self.arcs();
        let mut it = arcs.iter();

        if let Some(first) = it.next() {
            write!(f, "{}", first)?;
        }
        for arc in it {
            write!(f, ".{}", arc)?;
        }

        Ok(())
    }
}

impl fmt::Debug for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ObjectIdentifier({})", self)
    }
}
