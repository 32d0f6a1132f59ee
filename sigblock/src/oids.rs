//! Object identifiers used in signature blocks.
//!
//! The registry is a constant table: every entry carries its name, its dotted notation and the
//! DER content octets written into encoded values.

use sigblock_der::{DerNode, ObjectIdentifier};

/// A registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisteredOid {
    pub name: &'static str,
    pub dotted: &'static str,
    /// Content octets of the `OBJECT IDENTIFIER` value.
    pub der: &'static [u8],
}

impl RegisteredOid {
    pub const fn to_oid(&self) -> ObjectIdentifier {
        ObjectIdentifier::from_static(self.der)
    }

    /// `OBJECT IDENTIFIER` node.
    pub fn to_node(&self) -> DerNode {
        DerNode::oid(&self.to_oid())
    }

    /// `AlgorithmIdentifier` node with NULL parameters.
    ///
    /// ```not_rust
    /// AlgorithmIdentifier ::= SEQUENCE {
    ///     algorithm  OBJECT IDENTIFIER,
    ///     parameters ANY DEFINED BY algorithm OPTIONAL }
    /// ```
    pub fn algorithm_identifier(&self) -> DerNode {
        DerNode::sequence(vec![self.to_node(), DerNode::null()])
    }
}

macro_rules! define_oid {
    ( $( $uppercase:ident => $name:literal => $dotted:literal => [ $( $byte:literal ),+ $(,)? ], )+ ) => {
        $(
            pub const $uppercase: RegisteredOid = RegisteredOid {
                name: $name,
                dotted: $dotted,
                der: &[ $( $byte ),+ ],
            };
        )+

        /// Every registered identifier, in declaration order.
        pub const REGISTRY: &[RegisteredOid] = &[ $( $uppercase ),+ ];
    };
}

define_oid! {
    // OIW
    SHA1 => "sha1" => "1.3.14.3.2.26" => [0x2B, 0x0E, 0x03, 0x02, 0x1A],

    // NIST
    SHA224 => "sha224" => "2.16.840.1.101.3.4.2.4" => [0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x04],
    SHA256 => "sha256" => "2.16.840.1.101.3.4.2.1" => [0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01],
    SHA384 => "sha384" => "2.16.840.1.101.3.4.2.2" => [0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02],
    SHA512 => "sha512" => "2.16.840.1.101.3.4.2.3" => [0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03],

    // RSADSI
    RSA_ENCRYPTION => "rsaEncryption" => "1.2.840.113549.1.1.1"
        => [0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01],
    SHA1_WITH_RSA_ENCRYPTION => "sha1WithRSAEncryption" => "1.2.840.113549.1.1.5"
        => [0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x05],
    SHA256_WITH_RSA_ENCRYPTION => "sha256WithRSAEncryption" => "1.2.840.113549.1.1.11"
        => [0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0B],

    // pkcs7
    PKCS7_DATA => "pkcs7-data" => "1.2.840.113549.1.7.1"
        => [0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x01],
    PKCS7_SIGNED_DATA => "pkcs7-signedData" => "1.2.840.113549.1.7.2"
        => [0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x02],
}

/// Finds an entry by its name (e.g. `"sha256"`, `"rsaEncryption"`).
pub fn lookup(name: &str) -> Option<&'static RegisteredOid> {
    REGISTRY.iter().find(|entry| entry.name == name)
}

/// Finds an entry by its DER content octets.
pub fn lookup_der(der: &[u8]) -> Option<&'static RegisteredOid> {
    REGISTRY.iter().find(|entry| entry.der == der)
}
