use crate::certificate::{Certificate, IssuerAndSerial, MalformedCertificateError};
use crate::hash::HashAlgorithm;
use crate::oids;
use crate::signature::Signature;
use sigblock_der::DerNode;

/// Per-signer metadata of a `SignedData`.
///
/// ```not_rust
/// SignerInfo ::= SEQUENCE {
///     version Version,
///     issuerAndSerialNumber IssuerAndSerialNumber,
///     digestAlgorithm DigestAlgorithmIdentifier,
///     authenticatedAttributes [0] IMPLICIT Attributes OPTIONAL,
///     digestEncryptionAlgorithm DigestEncryptionAlgorithmIdentifier,
///     encryptedDigest EncryptedDigest,
///     unauthenticatedAttributes [1] IMPLICIT Attributes OPTIONAL }
/// ```
///
/// Neither attribute set is ever written, so the signature covers the content digest directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerInfo {
    issuer_and_serial: IssuerAndSerial,
    digest_algorithm: HashAlgorithm,
    signature: Signature,
}

impl SignerInfo {
    pub const VERSION: i64 = 1;

    /// Builds a signer info referencing `certificate`.
    pub fn new(
        certificate: &Certificate,
        digest_algorithm: HashAlgorithm,
        signature: Signature,
    ) -> Result<Self, MalformedCertificateError> {
        Ok(Self::from_issuer_and_serial(
            certificate.issuer_and_serial()?,
            digest_algorithm,
            signature,
        ))
    }

    pub fn from_issuer_and_serial(
        issuer_and_serial: IssuerAndSerial,
        digest_algorithm: HashAlgorithm,
        signature: Signature,
    ) -> Self {
        Self {
            issuer_and_serial,
            digest_algorithm,
            signature,
        }
    }

    pub fn issuer_and_serial(&self) -> &IssuerAndSerial {
        &self.issuer_and_serial
    }

    pub fn digest_algorithm(&self) -> HashAlgorithm {
        self.digest_algorithm
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn to_node(&self) -> DerNode {
        DerNode::sequence(vec![
            DerNode::integer(Self::VERSION),
            self.issuer_and_serial.to_node(),
            self.digest_algorithm.algorithm_identifier_node(),
            oids::RSA_ENCRYPTION.algorithm_identifier(),
            DerNode::octet_string(self.signature.as_bytes()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use pretty_assertions::assert_eq;
    use sigblock_der::{DerReader, Tag};
    use sigblock_test_data::LEGACY_V1_CERT;

    #[test]
    fn encoding() {
        let certificate = Certificate::from_pem_str(LEGACY_V1_CERT).unwrap();
        let signer_info = SignerInfo::new(
            &certificate,
            HashAlgorithm::SHA1,
            Signature::from_bytes(vec![0xAA; 4]),
        )
        .unwrap();

        let der = signer_info.to_node().encode().unwrap();
        expect!["3044020101301f30183116301406035504030c0d4c6567616379205369676e657202030080f1300906052b0e03021a0500300d06092a864886f70d01010105000404aaaaaaaa"]
            .assert_eq(&hex::encode(&der));

        let mut reader = DerReader::new(&der);
        let seq = reader.read_expected(Tag::SEQUENCE).unwrap();
        reader.finish().unwrap();

        let mut fields = seq.reader();
        assert_eq!(fields.read_expected(Tag::INTEGER).unwrap().value, &[0x01]);
        assert_eq!(
            fields.read_expected(Tag::SEQUENCE).unwrap().raw,
            signer_info.issuer_and_serial().to_node().encode().unwrap().as_slice()
        );
        fields.read_expected(Tag::SEQUENCE).unwrap();
        fields.read_expected(Tag::SEQUENCE).unwrap();
        assert_eq!(fields.read_expected(Tag::OCTET_STRING).unwrap().value, &[0xAA; 4]);
        fields.finish().unwrap();
    }
}
