use crate::EncodingError;
use std::fmt;

/// Class bits of an identifier octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    const fn bits(self) -> u8 {
        match self {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xC0,
        }
    }

    const fn from_bits(octet: u8) -> Self {
        match octet & 0xC0 {
            0x00 => TagClass::Universal,
            0x40 => TagClass::Application,
            0x80 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }
}

/// A single-octet ASN.1 identifier.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tag(u8);

impl Tag {
    /// Highest tag number encodable in the low-tag-number form.
    pub const MAX_NUMBER: u8 = 30;

    const CONSTRUCTED: u8 = 0x20;
    const NUMBER_MASK: u8 = 0x1F;

    pub const BOOLEAN: Self = Tag(0x01);
    pub const INTEGER: Self = Tag(0x02);
    pub const BIT_STRING: Self = Tag(0x03);
    pub const OCTET_STRING: Self = Tag(0x04);
    pub const NULL: Self = Tag(0x05);
    pub const OID: Self = Tag(0x06);
    pub const UTF8_STRING: Self = Tag(0x0C);
    pub const PRINTABLE_STRING: Self = Tag(0x13);
    pub const IA5_STRING: Self = Tag(0x16);
    pub const UTC_TIME: Self = Tag(0x17);
    pub const GENERALIZED_TIME: Self = Tag(0x18);
    pub const SEQUENCE: Self = Tag(0x30);
    pub const SET: Self = Tag(0x31);

    // context-specific, constructed
    pub const CTX_0: Self = Tag(0xA0);
    pub const CTX_1: Self = Tag(0xA1);
    pub const CTX_2: Self = Tag(0xA2);
    pub const CTX_3: Self = Tag(0xA3);

    /// Builds an identifier, rejecting tag numbers that would need the high-tag-number form.
    pub fn new(class: TagClass, constructed: bool, number: u8) -> Result<Self, EncodingError> {
        if number > Self::MAX_NUMBER {
            return Err(EncodingError::TagNumberOutOfRange { number });
        }

        let constructed = if constructed { Self::CONSTRUCTED } else { 0 };
        Ok(Tag(class.bits() | constructed | number))
    }

    #[inline]
    pub fn context_specific_primitive(number: u8) -> Result<Self, EncodingError> {
        Self::new(TagClass::ContextSpecific, false, number)
    }

    #[inline]
    pub fn context_specific_constructed(number: u8) -> Result<Self, EncodingError> {
        Self::new(TagClass::ContextSpecific, true, number)
    }

    /// Raw identifier octet.
    #[inline]
    pub const fn inner(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn number(self) -> u8 {
        self.0 & Self::NUMBER_MASK
    }

    #[inline]
    pub const fn class(self) -> TagClass {
        TagClass::from_bits(self.0)
    }

    #[inline]
    pub const fn is_constructed(self) -> bool {
        self.0 & Self::CONSTRUCTED != 0
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        !self.is_constructed()
    }

    #[inline]
    pub fn is_context_specific(self) -> bool {
        self.class() == TagClass::ContextSpecific
    }
}

impl From<u8> for Tag {
    fn from(tag: u8) -> Self {
        Self(tag)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            other => match other.class() {
                TagClass::ContextSpecific => write!(f, "[{}]", other.number()),
                TagClass::Application => write!(f, "[APPLICATION {}]", other.number()),
                TagClass::Private => write!(f, "[PRIVATE {}]", other.number()),
                TagClass::Universal => write!(f, "UNIVERSAL({})", other.number()),
            },
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({}[0x{:02X}])", self, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TagClass::Universal, false, 2, 0x02)]
    #[case(TagClass::Universal, true, 16, 0x30)]
    #[case(TagClass::Universal, true, 17, 0x31)]
    #[case(TagClass::ContextSpecific, true, 0, 0xA0)]
    #[case(TagClass::ContextSpecific, false, 1, 0x81)]
    #[case(TagClass::Application, true, 30, 0x7E)]
    #[case(TagClass::Private, false, 3, 0xC3)]
    fn identifier_octet(#[case] class: TagClass, #[case] constructed: bool, #[case] number: u8, #[case] octet: u8) {
        let tag = Tag::new(class, constructed, number).unwrap();
        assert_eq!(tag.inner(), octet);
        assert_eq!(tag.class(), class);
        assert_eq!(tag.number(), number);
        assert_eq!(tag.is_constructed(), constructed);
    }

    #[test]
    fn number_above_30_is_rejected() {
        let err = Tag::new(TagClass::ContextSpecific, true, 31).unwrap_err();
        assert_eq!(err, EncodingError::TagNumberOutOfRange { number: 31 });
    }

    #[test]
    fn display() {
        assert_eq!(Tag::SEQUENCE.to_string(), "SEQUENCE");
        assert_eq!(Tag::context_specific_constructed(0).unwrap().to_string(), "[0]");
        assert_eq!(Tag::context_specific_constructed(3).unwrap(), Tag::CTX_3);
        assert_eq!(format!("{:?}", Tag::OCTET_STRING), "Tag(OCTET STRING[0x04])");
    }
}
