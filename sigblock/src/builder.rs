//! Detached signature block assembly.
//!
//! [`assemble`] runs the whole pipeline in one call:
//! content → digest → signature → `SignerInfo` → `SignedData` → DER.
//! [`SignedDataBuilder`] gathers the same inputs step by step.

use crate::certificate::{Certificate, IssuerAndSerial, MalformedCertificateError};
use crate::hash::{compute_digest, HashAlgorithm};
use crate::key::SigningKey;
use crate::pem::{Pem, PKCS7_PEM_LABEL};
use crate::signature::{sign, SigningError};
use crate::signed_data::SignedData;
use crate::signer_info::SignerInfo;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use sigblock_der::EncodingError;
use std::cell::RefCell;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Pkcs7Error {
    /// DER encoding error
    #[error("DER encoding error: {source}")]
    Encoding {
        #[from]
        source: EncodingError,
    },

    /// signing error
    #[error("signing error: {source}")]
    Signing {
        #[from]
        source: SigningError,
    },

    /// malformed certificate
    #[error("malformed certificate: {source}")]
    MalformedCertificate {
        #[from]
        source: MalformedCertificateError,
    },

    /// builder argument is missing
    #[error("missing required builder argument `{arg}`")]
    MissingBuilderArgument { arg: &'static str },
}

/// Produces the DER encoding of a detached `SignedData` over `content`.
///
/// `certificates` are embedded as is, in order; when empty the certificates field is omitted.
/// The signer is referenced by `issuer_and_serial`, which normally comes from the first certificate.
///
/// Nothing is returned unless every step succeeded.
pub fn assemble<R>(
    content: &[u8],
    algorithm: HashAlgorithm,
    key: &SigningKey,
    issuer_and_serial: &IssuerAndSerial,
    certificates: &[Certificate],
    rng: &mut R,
) -> Result<Vec<u8>, Pkcs7Error>
where
    R: CryptoRngCore,
{
    let digest = compute_digest(content, algorithm);
    let signature = sign(&digest, key, rng)?;
    log::debug!("produced {}-byte signature", signature.len());

    let signer_info = SignerInfo::from_issuer_and_serial(issuer_and_serial.clone(), algorithm, signature);
    let signed_data = SignedData::new(vec![signer_info], certificates.to_vec());

    Ok(signed_data.to_der()?)
}

/// Serializable subset of the builder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    pub digest_algorithm: HashAlgorithm,
    pub embed_certificates: bool,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            digest_algorithm: HashAlgorithm::SHA1,
            embed_certificates: true,
        }
    }
}

#[derive(Default, Clone, Debug)]
struct SignedDataBuilderInner {
    digest_algorithm: Option<HashAlgorithm>,
    certificate: Option<Certificate>,
    additional_certificates: Vec<Certificate>,
    signer_identifier: Option<IssuerAndSerial>,
    embed_certificates: Option<bool>,
}

/// Builder for detached signature blocks.
///
/// ```
/// use sigblock::{Certificate, SignedDataBuilder, SigningKey};
/// # use sigblock_test_data::{RSA_1024_PK_1, SIGNER_V3_CERT};
///
/// let key = SigningKey::from_pem_str(RSA_1024_PK_1).unwrap();
/// let certificate = Certificate::from_pem_str(SIGNER_V3_CERT).unwrap();
///
/// let block = SignedDataBuilder::new()
///     .certificate(certificate)
///     .build(b"Hello world,\nThis is signed.", &key)
///     .unwrap();
///
/// assert_eq!(block[0], 0x30);
/// ```
#[derive(Default, Clone, Debug)]
pub struct SignedDataBuilder {
    inner: RefCell<SignedDataBuilderInner>,
}

impl SignedDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a builder from a configuration.
    pub fn from_config(config: &SignerConfig) -> Self {
        let builder = Self::new();
        builder
            .digest_algorithm(config.digest_algorithm)
            .embed_certificates(config.embed_certificates);
        builder
    }

    /// Optional (default is `SHA1`)
    #[inline]
    pub fn digest_algorithm(&self, algorithm: HashAlgorithm) -> &Self {
        self.inner.borrow_mut().digest_algorithm = Some(algorithm);
        self
    }

    /// Signer certificate, embedded first and used to identify the signer.
    ///
    /// Required (alternative: `signer_identifier`)
    #[inline]
    pub fn certificate(&self, certificate: Certificate) -> &Self {
        self.inner.borrow_mut().certificate = Some(certificate);
        self
    }

    /// Chain certificates embedded after the signer certificate.
    ///
    /// Optional
    #[inline]
    pub fn additional_certificates(&self, certificates: Vec<Certificate>) -> &Self {
        self.inner.borrow_mut().additional_certificates = certificates;
        self
    }

    /// Explicit signer reference. Takes precedence over the one found in the signer certificate.
    ///
    /// Required (alternative: `certificate`)
    #[inline]
    pub fn signer_identifier(&self, issuer_and_serial: IssuerAndSerial) -> &Self {
        self.inner.borrow_mut().signer_identifier = Some(issuer_and_serial);
        self
    }

    /// Optional (default is `true`)
    #[inline]
    pub fn embed_certificates(&self, embed: bool) -> &Self {
        self.inner.borrow_mut().embed_certificates = Some(embed);
        self
    }

    /// Builds the block using the operating system random source for blinding.
    pub fn build(&self, content: &[u8], key: &SigningKey) -> Result<Vec<u8>, Pkcs7Error> {
        self.build_with_rng(content, key, &mut rand::rngs::OsRng)
    }

    pub fn build_with_rng<R>(&self, content: &[u8], key: &SigningKey, rng: &mut R) -> Result<Vec<u8>, Pkcs7Error>
    where
        R: CryptoRngCore,
    {
        let inner = self.inner.borrow();

        let algorithm = inner.digest_algorithm.unwrap_or_default();
        let embed_certificates = inner.embed_certificates.unwrap_or(true);

        // resolved before any private key operation so a bad certificate fails early
        let issuer_and_serial = match (&inner.signer_identifier, &inner.certificate) {
            (Some(issuer_and_serial), _) => issuer_and_serial.clone(),
            (None, Some(certificate)) => certificate.issuer_and_serial()?,
            (None, None) => {
                return Err(Pkcs7Error::MissingBuilderArgument {
                    arg: "signer_identifier",
                })
            }
        };

        let certificates: Vec<Certificate> = if embed_certificates {
            inner
                .certificate
                .iter()
                .chain(inner.additional_certificates.iter())
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        log::debug!(
            "building signed data: {} content bytes, {}, {} embedded certificate(s)",
            content.len(),
            algorithm,
            certificates.len()
        );

        assemble(content, algorithm, key, &issuer_and_serial, &certificates, rng)
    }

    /// Same as [`build`](Self::build), rendered as a `PKCS7` PEM block.
    pub fn build_pem(&self, content: &[u8], key: &SigningKey) -> Result<String, Pkcs7Error> {
        let der = self.build(content, key)?;
        Ok(Pem::new(PKCS7_PEM_LABEL, der).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sigblock_der::DerReader;
    use sigblock_test_data::{HELLO_CONTENT, LEGACY_V1_CERT, RSA_1024_PK_1, RSA_512_PK_1, SIGNER_V3_CERT};

    fn key() -> SigningKey {
        SigningKey::from_pem_str(RSA_1024_PK_1).unwrap()
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn missing_signer_identifier() {
        let err = SignedDataBuilder::new()
            .build_with_rng(HELLO_CONTENT, &key(), &mut rng())
            .unwrap_err();
        assert!(matches!(
            err,
            Pkcs7Error::MissingBuilderArgument {
                arg: "signer_identifier"
            }
        ));
    }

    #[test]
    fn certificate_can_be_left_out() {
        let certificate = Certificate::from_pem_str(SIGNER_V3_CERT).unwrap();

        let builder = SignedDataBuilder::new();
        builder.certificate(certificate.clone());
        let with_certificate = builder.build_with_rng(HELLO_CONTENT, &key(), &mut rng()).unwrap();

        builder.embed_certificates(false);
        let without_certificate = builder.build_with_rng(HELLO_CONTENT, &key(), &mut rng()).unwrap();

        assert_eq!(
            with_certificate.len() - without_certificate.len(),
            certificate.as_der().len() + 4
        );
        DerReader::new(&without_certificate).validate_all().unwrap();
    }

    #[test]
    fn explicit_identifier_without_certificate() {
        let from_certificate = Certificate::from_pem_str(SIGNER_V3_CERT)
            .unwrap()
            .issuer_and_serial()
            .unwrap();

        let explicit = SignedDataBuilder::new()
            .signer_identifier(from_certificate.clone())
            .build_with_rng(HELLO_CONTENT, &key(), &mut rng())
            .unwrap();

        let implicit = SignedDataBuilder::new()
            .certificate(Certificate::from_pem_str(SIGNER_V3_CERT).unwrap())
            .embed_certificates(false)
            .build_with_rng(HELLO_CONTENT, &key(), &mut rng())
            .unwrap();

        assert_eq!(explicit, implicit);
    }

    #[test]
    fn chain_certificates_follow_signer_certificate() {
        let signer = Certificate::from_pem_str(SIGNER_V3_CERT).unwrap();
        let chain = Certificate::from_pem_str(LEGACY_V1_CERT).unwrap();

        let der = SignedDataBuilder::new()
            .certificate(signer.clone())
            .additional_certificates(vec![chain.clone()])
            .build_with_rng(HELLO_CONTENT, &key(), &mut rng())
            .unwrap();

        let mut expected = signer.as_der().to_vec();
        expected.extend_from_slice(chain.as_der());
        assert!(der.windows(expected.len()).any(|window| window == expected.as_slice()));
    }

    #[test]
    fn build_does_not_consume_configuration() {
        let builder = SignedDataBuilder::new();
        builder.certificate(Certificate::from_pem_str(SIGNER_V3_CERT).unwrap());

        let first = builder.build_with_rng(HELLO_CONTENT, &key(), &mut rng()).unwrap();
        let second = builder.build_with_rng(HELLO_CONTENT, &key(), &mut rng()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn no_output_when_signing_fails() {
        let key = SigningKey::from_pem_str(RSA_512_PK_1).unwrap();
        let result = SignedDataBuilder::new()
            .certificate(Certificate::from_pem_str(SIGNER_V3_CERT).unwrap())
            .digest_algorithm(HashAlgorithm::SHA2_512)
            .build_with_rng(HELLO_CONTENT, &key, &mut rng());

        assert!(matches!(
            result,
            Err(Pkcs7Error::Signing {
                source: SigningError::MessageTooLong { .. }
            })
        ));
    }

    #[test]
    fn malformed_certificate_is_reported_before_signing() {
        // SEQUENCE { SEQUENCE {} }
        let certificate = Certificate::from_der(&[0x30, 0x02, 0x30, 0x00]).unwrap();
        let err = SignedDataBuilder::new()
            .certificate(certificate)
            .build_with_rng(HELLO_CONTENT, &key(), &mut rng())
            .unwrap_err();
        assert!(matches!(err, Pkcs7Error::MalformedCertificate { .. }));
    }

    #[test]
    fn config_from_json() {
        let config: SignerConfig = serde_json::from_str(r#"{ "digest_algorithm": "SHA2_256" }"#).unwrap();
        assert_eq!(
            config,
            SignerConfig {
                digest_algorithm: HashAlgorithm::SHA2_256,
                embed_certificates: true,
            }
        );

        let config: SignerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SignerConfig::default());

        let builder = SignedDataBuilder::from_config(&SignerConfig {
            digest_algorithm: HashAlgorithm::SHA2_256,
            embed_certificates: false,
        });
        builder.certificate(Certificate::from_pem_str(SIGNER_V3_CERT).unwrap());
        let der = builder.build_with_rng(HELLO_CONTENT, &key(), &mut rng()).unwrap();

        let sha256_algorithm_identifier = HashAlgorithm::SHA2_256.algorithm_identifier_node().encode().unwrap();
        assert!(der
            .windows(sha256_algorithm_identifier.len())
            .any(|window| window == sha256_algorithm_identifier.as_slice()));
    }

    #[test]
    fn pem_rendering() {
        let builder = SignedDataBuilder::new();
        builder.certificate(Certificate::from_pem_str(SIGNER_V3_CERT).unwrap());

        let pem = builder.build_pem(HELLO_CONTENT, &key()).unwrap();
        let parsed = Pem::parse_labeled(&pem, &[PKCS7_PEM_LABEL]).unwrap();
        assert_eq!(parsed.label(), PKCS7_PEM_LABEL);

        let der = builder.build_with_rng(HELLO_CONTENT, &key(), &mut rng()).unwrap();
        assert_eq!(parsed.data(), der.as_slice());
    }
}
