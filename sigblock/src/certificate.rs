//! Signer certificate handling.
//!
//! Certificates are kept as opaque DER. Only the fields a signer reference needs are located,
//! by walking the fixed prefix of the `TBSCertificate` layout:
//!
//! ```not_rust
//! Certificate ::= SEQUENCE {
//!     tbsCertificate       TBSCertificate,
//!     signatureAlgorithm   AlgorithmIdentifier,
//!     signatureValue       BIT STRING }
//!
//! TBSCertificate ::= SEQUENCE {
//!     version         [0]  EXPLICIT Version DEFAULT v1,
//!     serialNumber         CertificateSerialNumber,
//!     signature            AlgorithmIdentifier,
//!     issuer               Name,
//!     validity             Validity,
//!     subject              Name,
//!     subjectPublicKeyInfo SubjectPublicKeyInfo,
//!     ... }
//! ```

use crate::key::{KeyError, VerifyingKey};
use crate::pem::{Pem, PemError};
use sigblock_der::{DecodeError, DerNode, DerReader, Tag, Tlv};
use std::fmt;
use thiserror::Error;

const CERT_PEM_LABEL: &str = "CERTIFICATE";

#[derive(Debug, Clone, Error)]
pub enum MalformedCertificateError {
    /// a field is missing or not where expected
    #[error("couldn't locate certificate field `{field}`: {source}")]
    Field {
        field: &'static str,
        source: DecodeError,
    },

    /// serial number has no content octets
    #[error("certificate serial number is empty")]
    EmptySerial,

    /// invalid PEM label error
    #[error("invalid PEM label: {label}")]
    InvalidPemLabel { label: String },

    /// invalid PEM provided
    #[error("invalid PEM provided: {source}")]
    Pem { source: PemError },
}

impl From<PemError> for MalformedCertificateError {
    fn from(e: PemError) -> Self {
        match e {
            PemError::UnexpectedLabel { label } => Self::InvalidPemLabel { label },
            source => Self::Pem { source },
        }
    }
}

fn field(field: &'static str) -> impl FnOnce(DecodeError) -> MalformedCertificateError {
    move |source| MalformedCertificateError::Field { field, source }
}

/// A DER-encoded X.509 certificate.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Certificate {
    der: Vec<u8>,
}

impl Certificate {
    /// Wraps certificate bytes after checking they form exactly one `SEQUENCE`.
    pub fn from_der<T: ?Sized + AsRef<[u8]>>(der: &T) -> Result<Self, MalformedCertificateError> {
        let der = der.as_ref();

        let mut reader = DerReader::new(der);
        reader.read_expected(Tag::SEQUENCE).map_err(field("certificate"))?;
        reader.finish().map_err(field("certificate"))?;

        Ok(Self { der: der.to_vec() })
    }

    pub fn from_pem(pem: &Pem) -> Result<Self, MalformedCertificateError> {
        match pem.label() {
            CERT_PEM_LABEL => Self::from_der(pem.data()),
            _ => Err(MalformedCertificateError::InvalidPemLabel {
                label: pem.label().to_owned(),
            }),
        }
    }

    pub fn from_pem_str(pem_str: &str) -> Result<Self, MalformedCertificateError> {
        let pem = Pem::parse_labeled(pem_str, &[CERT_PEM_LABEL])?;
        Self::from_pem(&pem)
    }

    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    pub fn to_pem(&self) -> Pem<'_> {
        Pem::new(CERT_PEM_LABEL, self.der.as_slice())
    }

    /// Issuer name and serial number, copied verbatim from the certificate.
    pub fn issuer_and_serial(&self) -> Result<IssuerAndSerial, MalformedCertificateError> {
        let fields = self.tbs_fields()?;
        if fields.serial.value.is_empty() {
            return Err(MalformedCertificateError::EmptySerial);
        }

        Ok(IssuerAndSerial {
            issuer: fields.issuer.raw.to_vec(),
            serial: fields.serial.raw.to_vec(),
        })
    }

    /// Raw `SubjectPublicKeyInfo` TLV.
    pub fn subject_public_key_info(&self) -> Result<&[u8], MalformedCertificateError> {
        Ok(self.tbs_fields()?.subject_public_key_info.raw)
    }

    /// Public key of the certificate subject.
    pub fn verifying_key(&self) -> Result<VerifyingKey, KeyError> {
        let spki = self.subject_public_key_info().map_err(|e| KeyError::Rsa {
            context: e.to_string(),
        })?;
        VerifyingKey::from_public_key_der(spki)
    }

    fn tbs_fields(&self) -> Result<TbsFields<'_>, MalformedCertificateError> {
        let certificate = DerReader::new(&self.der)
            .read_expected(Tag::SEQUENCE)
            .map_err(field("certificate"))?;

        let tbs = certificate
            .reader()
            .read_expected(Tag::SEQUENCE)
            .map_err(field("tbsCertificate"))?;

        let mut reader = tbs.reader();

        // absent for v1 certificates
        reader.read_optional(Tag::CTX_0).map_err(field("version"))?;

        let serial = reader.read_expected(Tag::INTEGER).map_err(field("serialNumber"))?;
        reader.read_expected(Tag::SEQUENCE).map_err(field("signature"))?;
        let issuer = reader.read_expected(Tag::SEQUENCE).map_err(field("issuer"))?;
        reader.read_expected(Tag::SEQUENCE).map_err(field("validity"))?;
        reader.read_expected(Tag::SEQUENCE).map_err(field("subject"))?;
        let subject_public_key_info = reader
            .read_expected(Tag::SEQUENCE)
            .map_err(field("subjectPublicKeyInfo"))?;

        log::trace!(
            "certificate fields located: serial at {}, issuer at {}",
            serial.offset,
            issuer.offset
        );

        Ok(TbsFields {
            serial,
            issuer,
            subject_public_key_info,
        })
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate").field("der_len", &self.der.len()).finish()
    }
}

struct TbsFields<'a> {
    serial: Tlv<'a>,
    issuer: Tlv<'a>,
    subject_public_key_info: Tlv<'a>,
}

/// Signer identifier.
///
/// ```not_rust
/// IssuerAndSerialNumber ::= SEQUENCE {
///     issuer Name,
///     serialNumber CertificateSerialNumber }
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IssuerAndSerial {
    issuer: Vec<u8>,
    serial: Vec<u8>,
}

impl IssuerAndSerial {
    /// Builds an identifier from an encoded `Name` and an encoded `INTEGER`.
    ///
    /// Used when the signer certificate is not at hand.
    pub fn new(issuer_der: Vec<u8>, serial_der: Vec<u8>) -> Result<Self, MalformedCertificateError> {
        let mut reader = DerReader::new(&issuer_der);
        reader.read_expected(Tag::SEQUENCE).map_err(field("issuer"))?;
        reader.finish().map_err(field("issuer"))?;

        let mut reader = DerReader::new(&serial_der);
        let serial = reader.read_expected(Tag::INTEGER).map_err(field("serialNumber"))?;
        if serial.value.is_empty() {
            return Err(MalformedCertificateError::EmptySerial);
        }
        reader.finish().map_err(field("serialNumber"))?;

        Ok(Self {
            issuer: issuer_der,
            serial: serial_der,
        })
    }

    /// Encoded issuer `Name`.
    pub fn issuer_der(&self) -> &[u8] {
        &self.issuer
    }

    /// Encoded serial `INTEGER`.
    pub fn serial_der(&self) -> &[u8] {
        &self.serial
    }

    pub fn to_node(&self) -> DerNode {
        DerNode::sequence(vec![DerNode::raw(self.issuer.as_slice()), DerNode::raw(self.serial.as_slice())])
    }
}

impl fmt::Debug for IssuerAndSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerAndSerial")
            .field("issuer", &hex::encode(&self.issuer))
            .field("serial", &hex::encode(&self.serial))
            .finish()
    }
}
