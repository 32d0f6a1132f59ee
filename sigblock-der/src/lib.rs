//! # sigblock-der
//!
//! A small ASN.1 DER toolkit: a node tree that is encoded bottom-up into canonical DER,
//! and a structural TLV reader used to locate fields inside already-encoded values.
//!
//! Only what detached signature blocks need is supported: single-octet identifiers
//! (tag numbers 0 to 30) and definite lengths.
//!
//! ```
//! use sigblock_der::{DerNode, ObjectIdentifier};
//!
//! let sha1: ObjectIdentifier = "1.3.14.3.2.26".parse().unwrap();
//! let algorithm_identifier = DerNode::sequence(vec![DerNode::oid(&sha1), DerNode::null()]);
//!
//! let der = algorithm_identifier.encode().unwrap();
//! assert_eq!(der, b"\x30\x09\x06\x05\x2b\x0e\x03\x02\x1a\x05\x00");
//! ```

mod error;

pub mod length;
pub mod node;
pub mod oid;
pub mod reader;
pub mod tag;

pub use error::{DecodeError, EncodingError};
pub use node::DerNode;
pub use oid::ObjectIdentifier;
pub use reader::{DerReader, Tlv};
pub use tag::{Tag, TagClass};
