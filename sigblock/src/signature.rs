//! RSA PKCS #1 v1.5 signature over a precomputed digest.
//!
//! The signer takes a [`ContentDigest`] rather than the content itself: the padded block is
//! `00 01 FF..FF 00 || DigestInfo` and the signature is `EM^d mod n`, left-padded to the modulus
//! size. A random source is required for blinding; it doesn't change the resulting bytes, so the
//! same key and digest always give the same signature.

use crate::hash::ContentDigest;
use crate::key::{SigningKey, VerifyingKey};
use rand_core::CryptoRngCore;
use sigblock_der::EncodingError;
use std::fmt;
use thiserror::Error;

/// Minimum overhead of PKCS #1 v1.5 type 1 padding: `00 01`, eight `FF` and `00`.
const PADDING_OVERHEAD: usize = 11;

#[derive(Debug, Error)]
pub enum SigningError {
    /// digest info doesn't fit in the modulus
    #[error("digest info ({digest_info_len} bytes) is too long for a {modulus_len}-byte modulus")]
    MessageTooLong { digest_info_len: usize, modulus_len: usize },

    /// digest has the wrong size for its algorithm
    #[error("digest length mismatch: expected {expected} bytes, got {actual}")]
    DigestLength { expected: usize, actual: usize },

    /// key components are inconsistent
    #[error("malformed private key: {context}")]
    MalformedKey { context: String },

    /// digest info encoding failed
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// RSA error
    #[error("RSA error: {context}")]
    Rsa { context: String },
}

#[derive(Debug, Error)]
pub enum VerificationError {
    /// invalid signature
    #[error("invalid signature")]
    BadSignature,

    /// signature has the wrong size for the key
    #[error("signature length mismatch: expected {expected} bytes, got {actual}")]
    SignatureLength { expected: usize, actual: usize },
}

/// Raw signature bytes, exactly the size of the signer's modulus.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(&self.0))
    }
}

/// Signs `digest` with `key`.
///
/// Checks happen before any private key operation: inconsistent key components, a digest whose
/// size doesn't match its algorithm, and a `DigestInfo` that doesn't fit the modulus are all
/// reported as errors.
pub fn sign<R>(digest: &ContentDigest, key: &SigningKey, rng: &mut R) -> Result<Signature, SigningError>
where
    R: CryptoRngCore,
{
    let rsa_key = key
        .to_rsa()
        .map_err(|e| SigningError::MalformedKey { context: e.to_string() })?;

    let algorithm = digest.algorithm();
    if digest.as_bytes().len() != algorithm.output_size() {
        return Err(SigningError::DigestLength {
            expected: algorithm.output_size(),
            actual: digest.as_bytes().len(),
        });
    }

    let digest_info_len = digest.digest_info_node().encoded_len()?;
    let modulus_len = key.modulus_size();
    if modulus_len < digest_info_len + PADDING_OVERHEAD {
        return Err(SigningError::MessageTooLong {
            digest_info_len,
            modulus_len,
        });
    }

    log::debug!("signing {} digest with a {}-bit key", algorithm, modulus_len * 8);

    let signature = rsa_key
        .sign_with_rng(rng, algorithm.pkcs1v15_scheme(), digest.as_bytes())
        .map_err(|e| SigningError::Rsa { context: e.to_string() })?;

    Ok(Signature(signature))
}

/// Checks `signature` against `digest`.
pub fn verify(digest: &ContentDigest, signature: &Signature, key: &VerifyingKey) -> Result<(), VerificationError> {
    if signature.len() != key.modulus_size() {
        return Err(VerificationError::SignatureLength {
            expected: key.modulus_size(),
            actual: signature.len(),
        });
    }

    key.as_rsa()
        .verify(digest.algorithm().pkcs1v15_scheme(), digest.as_bytes(), signature.as_bytes())
        .map_err(|_| VerificationError::BadSignature)
}
