//! `SignedData` and its `ContentInfo` envelope.
//!
//! ```not_rust
//! ContentInfo ::= SEQUENCE {
//!     contentType ContentType,
//!     content [0] EXPLICIT ANY DEFINED BY contentType OPTIONAL }
//!
//! SignedData ::= SEQUENCE {
//!     version Version,
//!     digestAlgorithms DigestAlgorithmIdentifiers,
//!     contentInfo ContentInfo,
//!     certificates [0] IMPLICIT ExtendedCertificatesAndCertificates OPTIONAL,
//!     crls [1] IMPLICIT CertificateRevocationLists OPTIONAL,
//!     signerInfos SignerInfos }
//! ```
//!
//! The encapsulated `ContentInfo` is detached: it only carries the `data` content type.

use crate::certificate::Certificate;
use crate::hash::HashAlgorithm;
use crate::oids;
use crate::signer_info::SignerInfo;
use sigblock_der::{DerNode, EncodingError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignedData {
    signer_infos: Vec<SignerInfo>,
    certificates: Vec<Certificate>,
}

impl SignedData {
    pub const VERSION: i64 = 1;

    pub fn new(signer_infos: Vec<SignerInfo>, certificates: Vec<Certificate>) -> Self {
        Self {
            signer_infos,
            certificates,
        }
    }

    pub fn signer_infos(&self) -> &[SignerInfo] {
        &self.signer_infos
    }

    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    /// Digest algorithms of all signers, first occurrence order, without duplicates.
    pub fn digest_algorithms(&self) -> Vec<HashAlgorithm> {
        let mut algorithms: Vec<HashAlgorithm> = Vec::with_capacity(self.signer_infos.len());
        for signer_info in &self.signer_infos {
            let algorithm = signer_info.digest_algorithm();
            if !algorithms.contains(&algorithm) {
                algorithms.push(algorithm);
            }
        }
        algorithms
    }

    pub fn to_node(&self) -> Result<DerNode, EncodingError> {
        let digest_algorithms = self
            .digest_algorithms()
            .into_iter()
            .map(HashAlgorithm::algorithm_identifier_node)
            .collect();

        let detached_content_info = DerNode::sequence(vec![oids::PKCS7_DATA.to_node()]);

        let mut fields = vec![
            DerNode::integer(Self::VERSION),
            DerNode::set(digest_algorithms),
            detached_content_info,
        ];

        if !self.certificates.is_empty() {
            let certificates = self
                .certificates
                .iter()
                .map(|certificate| DerNode::raw(certificate.as_der()))
                .collect();
            fields.push(DerNode::implicit_constructed(0, certificates)?);
        }

        fields.push(DerNode::set(self.signer_infos.iter().map(SignerInfo::to_node).collect()));

        Ok(DerNode::sequence(fields))
    }

    /// Outer `ContentInfo` of type `signedData`.
    pub fn to_content_info_node(&self) -> Result<DerNode, EncodingError> {
        Ok(DerNode::sequence(vec![
            oids::PKCS7_SIGNED_DATA.to_node(),
            DerNode::explicit(0, self.to_node()?)?,
        ]))
    }

    /// DER encoding of the outer `ContentInfo`.
    pub fn to_der(&self) -> Result<Vec<u8>, EncodingError> {
        let der = self.to_content_info_node()?.encode()?;
        log::debug!(
            "encoded signed data: {} signer(s), {} certificate(s), {} bytes",
            self.signer_infos.len(),
            self.certificates.len(),
            der.len()
        );
        Ok(der)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::IssuerAndSerial;
    use crate::signature::Signature;
    use expect_test::expect;
    use pretty_assertions::assert_eq;
    use sigblock_der::{DerReader, Tag};
    use sigblock_test_data::LEGACY_V1_CERT;

    fn signer(algorithm: HashAlgorithm) -> SignerInfo {
        // issuer: SEQUENCE {}, serial: INTEGER 1
        let id = IssuerAndSerial::new(vec![0x30, 0x00], vec![0x02, 0x01, 0x01]).unwrap();
        SignerInfo::from_issuer_and_serial(id, algorithm, Signature::from_bytes(vec![0x55]))
    }

    #[test]
    fn minimal_block_without_certificates() {
        let signed_data = SignedData::new(vec![signer(HashAlgorithm::SHA1)], Vec::new());
        let der = signed_data.to_der().unwrap();

        expect!["305706092a864886f70d010702a04a3048020101310b300906052b0e03021a0500300b06092a864886f70d0107013129302702010130053000020101300906052b0e03021a0500300d06092a864886f70d0101010500040155"]
            .assert_eq(&hex::encode(&der));
    }

    #[test]
    fn digest_algorithms_are_deduplicated() {
        let signed_data = SignedData::new(
            vec![
                signer(HashAlgorithm::SHA2_256),
                signer(HashAlgorithm::SHA1),
                signer(HashAlgorithm::SHA2_256),
            ],
            Vec::new(),
        );
        assert_eq!(
            signed_data.digest_algorithms(),
            vec![HashAlgorithm::SHA2_256, HashAlgorithm::SHA1]
        );
    }

    #[test]
    fn certificates_are_implicitly_tagged() {
        let certificate = Certificate::from_pem_str(LEGACY_V1_CERT).unwrap();
        let signed_data = SignedData::new(vec![signer(HashAlgorithm::SHA1)], vec![certificate.clone()]);
        let der = signed_data.to_der().unwrap();

        let mut reader = DerReader::new(&der);
        let content_info = reader.read_expected(Tag::SEQUENCE).unwrap();
        reader.finish().unwrap();

        let mut content_info_fields = content_info.reader();
        content_info_fields.read_expected(Tag::OID).unwrap();
        let explicit = content_info_fields.read_expected(Tag::CTX_0).unwrap();
        content_info_fields.finish().unwrap();

        let signed_data_tlv = explicit.reader().read_expected(Tag::SEQUENCE).unwrap();
        let mut fields = signed_data_tlv.reader();
        fields.read_expected(Tag::INTEGER).unwrap();
        fields.read_expected(Tag::SET).unwrap();
        fields.read_expected(Tag::SEQUENCE).unwrap();
        let certificates = fields.read_expected(Tag::CTX_0).unwrap();
        assert_eq!(certificates.value, certificate.as_der());
        fields.read_expected(Tag::SET).unwrap();
        fields.finish().unwrap();
    }
}
