//! RSA key material.

use crate::pem::{Pem, PemError};
use num_bigint_dig::BigUint;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum KeyError {
    /// RSA error
    #[error("RSA error: {context}")]
    Rsa { context: String },

    /// invalid PEM label error
    #[error("invalid PEM label: {label}")]
    InvalidPemLabel { label: String },

    /// key components are inconsistent
    #[error("malformed RSA key: {context}")]
    Malformed { context: &'static str },

    /// invalid PEM provided
    #[error("invalid PEM provided: {source}")]
    Pem { source: PemError },
}

impl From<rsa::errors::Error> for KeyError {
    fn from(e: rsa::errors::Error) -> Self {
        Self::Rsa { context: e.to_string() }
    }
}

impl From<PemError> for KeyError {
    fn from(e: PemError) -> Self {
        match e {
            PemError::UnexpectedLabel { label } => Self::InvalidPemLabel { label },
            source => Self::Pem { source },
        }
    }
}

// === private key === //

const PRIVATE_KEY_PEM_LABEL: &str = "PRIVATE KEY";
const RSA_PRIVATE_KEY_PEM_LABEL: &str = "RSA PRIVATE KEY";

/// RSA private key used to produce signatures.
///
/// Key components are never printed: the `Debug` output only shows the modulus size.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    inner: PrivateKeyMaterial,
}

#[derive(Clone, PartialEq, Eq)]
enum PrivateKeyMaterial {
    /// Decoded or generated by `rsa`, consistent by construction.
    Checked(RsaPrivateKey),
    /// Caller-supplied components, checked when the key is first used for signing.
    Components {
        modulus: BigUint,
        public_exponent: BigUint,
        private_exponent: BigUint,
        primes: Vec<BigUint>,
    },
}

impl SigningKey {
    /// Builds a key from its raw components.
    ///
    /// Nothing is checked here: a zero modulus, missing primes or a mismatched exponent pair
    /// make [`sign`](crate::signature::sign) fail with `SigningError::MalformedKey`.
    pub fn from_rsa_components(
        modulus: &BigUint,
        public_exponent: &BigUint,
        private_exponent: &BigUint,
        primes: &[BigUint],
    ) -> Self {
        Self {
            inner: PrivateKeyMaterial::Components {
                modulus: modulus.clone(),
                public_exponent: public_exponent.clone(),
                private_exponent: private_exponent.clone(),
                primes: primes.to_vec(),
            },
        }
    }

    /// PKCS #1 `RSAPrivateKey` DER.
    pub fn from_pkcs1_der<T: ?Sized + AsRef<[u8]>>(der: &T) -> Result<Self, KeyError> {
        let inner = RsaPrivateKey::from_pkcs1_der(der.as_ref()).map_err(|e| KeyError::Rsa {
            context: format!("couldn't decode PKCS #1 private key: {}", e),
        })?;

        Ok(Self::from(inner))
    }

    /// PKCS #8 `PrivateKeyInfo` DER.
    pub fn from_pkcs8_der<T: ?Sized + AsRef<[u8]>>(der: &T) -> Result<Self, KeyError> {
        let inner = RsaPrivateKey::from_pkcs8_der(der.as_ref()).map_err(|e| KeyError::Rsa {
            context: format!("couldn't decode PKCS #8 private key: {}", e),
        })?;

        Ok(Self::from(inner))
    }

    pub fn from_pem(pem: &Pem) -> Result<Self, KeyError> {
        match pem.label() {
            PRIVATE_KEY_PEM_LABEL => Self::from_pkcs8_der(pem.data()),
            RSA_PRIVATE_KEY_PEM_LABEL => Self::from_pkcs1_der(pem.data()),
            _ => Err(KeyError::InvalidPemLabel {
                label: pem.label().to_owned(),
            }),
        }
    }

    pub fn from_pem_str(pem_str: &str) -> Result<Self, KeyError> {
        let pem = Pem::parse_labeled(pem_str, &[PRIVATE_KEY_PEM_LABEL, RSA_PRIVATE_KEY_PEM_LABEL])?;
        let label = pem.label().to_owned();
        let der = Zeroizing::new(pem.into_data().into_owned());
        Self::from_pem(&Pem::new(label, der.as_slice()))
    }

    /// **Beware**: this is insanely slow in debug builds.
    pub fn generate_rsa(bits: usize) -> Result<Self, KeyError> {
        use rand::rngs::OsRng;

        let inner = RsaPrivateKey::new(&mut OsRng, bits)?;
        Ok(Self::from(inner))
    }

    /// Size of the modulus in bytes, which is also the signature size.
    pub fn modulus_size(&self) -> usize {
        (self.modulus().bits() + 7) / 8
    }

    pub fn to_verifying_key(&self) -> VerifyingKey {
        let inner = match &self.inner {
            PrivateKeyMaterial::Checked(key) => key.to_public_key(),
            PrivateKeyMaterial::Components {
                modulus,
                public_exponent,
                ..
            } => RsaPublicKey::new_unchecked(modulus.clone(), public_exponent.clone()),
        };

        VerifyingKey { inner }
    }

    fn modulus(&self) -> &BigUint {
        match &self.inner {
            PrivateKeyMaterial::Checked(key) => key.n(),
            PrivateKeyMaterial::Components { modulus, .. } => modulus,
        }
    }

    /// Key usable for the private key operation.
    ///
    /// Raw components are checked first: a zero modulus or fewer than two primes are rejected
    /// before `rsa` sees them, then `rsa` checks the exponents against the primes.
    pub(crate) fn to_rsa(&self) -> Result<Cow<'_, RsaPrivateKey>, KeyError> {
        let (modulus, public_exponent, private_exponent, primes) = match &self.inner {
            PrivateKeyMaterial::Checked(key) => return Ok(Cow::Borrowed(key)),
            PrivateKeyMaterial::Components {
                modulus,
                public_exponent,
                private_exponent,
                primes,
            } => (modulus, public_exponent, private_exponent, primes),
        };

        if modulus.bits() == 0 {
            return Err(KeyError::Malformed { context: "zero modulus" });
        }
        if public_exponent.bits() == 0 || private_exponent.bits() == 0 {
            return Err(KeyError::Malformed { context: "zero exponent" });
        }
        if primes.len() < 2 {
            return Err(KeyError::Malformed {
                context: "at least two primes are required",
            });
        }
        if primes.iter().any(|prime| prime.bits() <= 1) {
            return Err(KeyError::Malformed { context: "invalid prime" });
        }

        let key = RsaPrivateKey::from_components(
            modulus.clone(),
            public_exponent.clone(),
            private_exponent.clone(),
            primes.clone(),
        )?;
        key.validate()?;

        Ok(Cow::Owned(key))
    }
}

impl From<RsaPrivateKey> for SigningKey {
    fn from(key: RsaPrivateKey) -> Self {
        Self {
            inner: PrivateKeyMaterial::Checked(key),
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("modulus_bits", &self.modulus().bits())
            .finish_non_exhaustive()
    }
}

// === public key === //

/// RSA public key used to check signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyingKey {
    inner: RsaPublicKey,
}

impl VerifyingKey {
    pub fn from_rsa_components(modulus: &BigUint, public_exponent: &BigUint) -> Result<Self, KeyError> {
        let inner = RsaPublicKey::new(modulus.clone(), public_exponent.clone())?;
        Ok(Self { inner })
    }

    /// `SubjectPublicKeyInfo` DER, as found in certificates.
    pub fn from_public_key_der<T: ?Sized + AsRef<[u8]>>(der: &T) -> Result<Self, KeyError> {
        let inner = RsaPublicKey::from_public_key_der(der.as_ref()).map_err(|e| KeyError::Rsa {
            context: format!("couldn't decode public key: {}", e),
        })?;

        Ok(Self { inner })
    }

    pub fn modulus_size(&self) -> usize {
        self.inner.size()
    }

    pub fn as_rsa(&self) -> &RsaPublicKey {
        &self.inner
    }
}

impl From<RsaPublicKey> for VerifyingKey {
    fn from(inner: RsaPublicKey) -> Self {
        Self { inner }
    }
}
