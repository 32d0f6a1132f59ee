//! Hash algorithms supported for content digests

use crate::oids::{self, RegisteredOid};
use digest::Digest;
use rsa::Pkcs1v15Sign;
use serde::{Deserialize, Serialize};
use sigblock_der::DerNode;
use std::fmt;

/// Supported hash algorithms
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum HashAlgorithm {
    #[default]
    SHA1,
    SHA2_224,
    SHA2_256,
    SHA2_384,
    SHA2_512,
}

impl HashAlgorithm {
    pub fn digest(self, msg: &[u8]) -> Vec<u8> {
        match self {
            Self::SHA1 => sha1::Sha1::digest(msg).as_slice().to_vec(),
            Self::SHA2_224 => sha2::Sha224::digest(msg).as_slice().to_vec(),
            Self::SHA2_256 => sha2::Sha256::digest(msg).as_slice().to_vec(),
            Self::SHA2_384 => sha2::Sha384::digest(msg).as_slice().to_vec(),
            Self::SHA2_512 => sha2::Sha512::digest(msg).as_slice().to_vec(),
        }
    }

    /// Digest size in bytes.
    pub fn output_size(self) -> usize {
        match self {
            Self::SHA1 => 20,
            Self::SHA2_224 => 28,
            Self::SHA2_256 => 32,
            Self::SHA2_384 => 48,
            Self::SHA2_512 => 64,
        }
    }

    pub fn registered_oid(self) -> &'static RegisteredOid {
        match self {
            Self::SHA1 => &oids::SHA1,
            Self::SHA2_224 => &oids::SHA224,
            Self::SHA2_256 => &oids::SHA256,
            Self::SHA2_384 => &oids::SHA384,
            Self::SHA2_512 => &oids::SHA512,
        }
    }

    /// Digest `AlgorithmIdentifier` (explicit NULL parameters).
    pub fn algorithm_identifier_node(self) -> DerNode {
        self.registered_oid().algorithm_identifier()
    }

    pub(crate) fn pkcs1v15_scheme(self) -> Pkcs1v15Sign {
        match self {
            Self::SHA1 => Pkcs1v15Sign::new::<sha1::Sha1>(),
            Self::SHA2_224 => Pkcs1v15Sign::new::<sha2::Sha224>(),
            Self::SHA2_256 => Pkcs1v15Sign::new::<sha2::Sha256>(),
            Self::SHA2_384 => Pkcs1v15Sign::new::<sha2::Sha384>(),
            Self::SHA2_512 => Pkcs1v15Sign::new::<sha2::Sha512>(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.registered_oid().name)
    }
}

/// Digest of a content, tagged with the algorithm that produced it.
#[derive(Clone, PartialEq, Eq)]
pub struct ContentDigest {
    algorithm: HashAlgorithm,
    bytes: Vec<u8>,
}

impl ContentDigest {
    /// Wraps an externally computed digest.
    ///
    /// The length is not checked here; signing rejects a digest whose size doesn't match the algorithm.
    pub fn from_parts(algorithm: HashAlgorithm, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// PKCS #1 `DigestInfo` wrapping this digest.
    ///
    /// ```not_rust
    /// DigestInfo ::= SEQUENCE {
    ///     digestAlgorithm AlgorithmIdentifier,
    ///     digest OCTET STRING }
    /// ```
    pub fn digest_info_node(&self) -> DerNode {
        DerNode::sequence(vec![
            self.algorithm.algorithm_identifier_node(),
            DerNode::octet_string(self.bytes.as_slice()),
        ])
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentDigest")
            .field("algorithm", &self.algorithm)
            .field("bytes", &hex::encode(&self.bytes))
            .finish()
    }
}

/// Hashes the whole content in one pass.
pub fn compute_digest(content: &[u8], algorithm: HashAlgorithm) -> ContentDigest {
    log::debug!("hashing {} content bytes with {}", content.len(), algorithm);
    ContentDigest {
        algorithm,
        bytes: algorithm.digest(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sigblock_test_data::{HELLO_CONTENT, HELLO_SHA1_HEX};

    #[test]
    fn sha1_of_known_content() {
        let digest = compute_digest(HELLO_CONTENT, HashAlgorithm::SHA1);
        assert_eq!(hex::encode(digest.as_bytes()), HELLO_SHA1_HEX);
        assert_eq!(digest.algorithm(), HashAlgorithm::SHA1);
    }

    #[test]
    fn empty_content() {
        let digest = compute_digest(b"", HashAlgorithm::SHA1);
        assert_eq!(
            hex::encode(digest.as_bytes()),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );

        let digest = compute_digest(b"", HashAlgorithm::SHA2_256);
        assert_eq!(
            hex::encode(digest.as_bytes()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[rstest]
    #[case(HashAlgorithm::SHA1)]
    #[case(HashAlgorithm::SHA2_224)]
    #[case(HashAlgorithm::SHA2_256)]
    #[case(HashAlgorithm::SHA2_384)]
    #[case(HashAlgorithm::SHA2_512)]
    fn output_size_matches_digest(#[case] algorithm: HashAlgorithm) {
        assert_eq!(algorithm.digest(b"abc").len(), algorithm.output_size());
    }

    #[test]
    fn sha1_digest_info() {
        let digest = compute_digest(HELLO_CONTENT, HashAlgorithm::SHA1);
        let der = digest.digest_info_node().encode().unwrap();
        assert_eq!(
            hex::encode(der),
            format!("3021300906052b0e03021a05000414{}", HELLO_SHA1_HEX)
        );
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&HashAlgorithm::SHA2_256).unwrap(), "\"SHA2_256\"");
        let alg: HashAlgorithm = serde_json::from_str("\"SHA1\"").unwrap();
        assert_eq!(alg, HashAlgorithm::SHA1);
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::SHA1);
    }

    #[test]
    fn debug_shows_hex() {
        let digest = ContentDigest::from_parts(HashAlgorithm::SHA1, vec![0xCA, 0xFE]);
        assert_eq!(
            format!("{:?}", digest),
            "ContentDigest { algorithm: SHA1, bytes: \"cafe\" }"
        );
    }
}
