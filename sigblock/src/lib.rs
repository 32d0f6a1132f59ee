//! # sigblock
//!
//! Detached PKCS #7 `SignedData` signature blocks signed with RSA PKCS #1 v1.5.
//!
//! Given content bytes, an RSA private key and the signer certificate, [`SignedDataBuilder`]
//! produces the DER encoding of
//!
//! ```not_rust
//! ContentInfo {
//!     contentType: signedData,
//!     content: [0] EXPLICIT SignedData {
//!         version: 1,
//!         digestAlgorithms: { sha1 },
//!         contentInfo: { data }, -- detached
//!         certificates: [0] IMPLICIT { signer certificate },
//!         signerInfos: { SignerInfo } } }
//! ```
//!
//! which standard tooling (`openssl asn1parse`, `openssl cms -verify`, `keytool -printcert`)
//! accepts.
//!
//! The signer must always be identified: version 1 `SignerInfo` references it by issuer name and
//! serial number only. Set either [`SignedDataBuilder::certificate`] or
//! [`SignedDataBuilder::signer_identifier`]; with neither, building fails with
//! [`Pkcs7Error::MissingBuilderArgument`]. Embedding the certificate is optional
//! ([`SignedDataBuilder::embed_certificates`]), naming the signer is not.

pub mod builder;
pub mod certificate;
pub mod hash;
pub mod key;
pub mod oids;
pub mod pem;
pub mod signature;
pub mod signed_data;
pub mod signer_info;

pub use builder::{assemble, Pkcs7Error, SignedDataBuilder, SignerConfig};
pub use certificate::{Certificate, IssuerAndSerial, MalformedCertificateError};
pub use hash::{compute_digest, ContentDigest, HashAlgorithm};
pub use key::{KeyError, SigningKey, VerifyingKey};
pub use signature::{sign, verify, Signature, SigningError, VerificationError};
pub use signed_data::SignedData;
pub use signer_info::SignerInfo;

pub use sigblock_der::EncodingError;
