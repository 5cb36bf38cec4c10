//! RSA digital signatures for AUTH payloads
//!
//! Implements RSASSA-PKCS1-v1_5 signing and verification for the
//! "RSA Digital Signature" authentication method (RFC 7296 Section 3.8).
//!
//! # Supported Key Formats
//!
//! - Private keys: PKCS#8 (`BEGIN PRIVATE KEY`), PKCS#1 (`BEGIN RSA PRIVATE KEY`), PKCS#8 DER
//! - Public keys: SPKI (`BEGIN PUBLIC KEY`), PKCS#1 (`BEGIN RSA PUBLIC KEY`), SPKI DER,
//!   X.509 certificates (DER)
//!
//! # Security
//!
//! - RSA keys must be at least 2048 bits
//! - Private key DER buffers are zeroized after the key pair is built

use crate::ipsec::{Error, Result};
use ring::rand::SystemRandom;
use ring::signature::{
    RsaEncoding, RsaKeyPair, RsaParameters, UnparsedPublicKey, RSA_PKCS1_2048_8192_SHA256,
    RSA_PKCS1_2048_8192_SHA384, RSA_PKCS1_2048_8192_SHA512, RSA_PKCS1_SHA256, RSA_PKCS1_SHA384,
    RSA_PKCS1_SHA512,
};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey};
use rsa::traits::PublicKeyParts;
use std::fmt;
use std::sync::Arc;

/// Minimum accepted RSA modulus size in bits
pub const MIN_RSA_BITS: usize = 2048;

/// Hash used with RSASSA-PKCS1-v1_5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RsaSignatureScheme {
    /// PKCS#1 v1.5 with SHA-256
    #[default]
    Sha256,
    /// PKCS#1 v1.5 with SHA-384
    Sha384,
    /// PKCS#1 v1.5 with SHA-512
    Sha512,
}

impl RsaSignatureScheme {
    /// Scheme name used in log records
    pub fn name(self) -> &'static str {
        match self {
            RsaSignatureScheme::Sha256 => "rsa-pkcs1-sha256",
            RsaSignatureScheme::Sha384 => "rsa-pkcs1-sha384",
            RsaSignatureScheme::Sha512 => "rsa-pkcs1-sha512",
        }
    }

    fn signing_encoding(self) -> &'static dyn RsaEncoding {
        match self {
            RsaSignatureScheme::Sha256 => &RSA_PKCS1_SHA256,
            RsaSignatureScheme::Sha384 => &RSA_PKCS1_SHA384,
            RsaSignatureScheme::Sha512 => &RSA_PKCS1_SHA512,
        }
    }

    fn verification_parameters(self) -> &'static RsaParameters {
        match self {
            RsaSignatureScheme::Sha256 => &RSA_PKCS1_2048_8192_SHA256,
            RsaSignatureScheme::Sha384 => &RSA_PKCS1_2048_8192_SHA384,
            RsaSignatureScheme::Sha512 => &RSA_PKCS1_2048_8192_SHA512,
        }
    }
}

/// RSA public key used to verify a peer's AUTH payload
///
/// Holds the PKCS#1 `RSAPublicKey` DER encoding; cloning is cheap.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKeyHandle {
    der: Arc<[u8]>,
    bits: usize,
}

impl PublicKeyHandle {
    fn from_rsa(key: rsa::RsaPublicKey) -> Result<Self> {
        let bits = key.size() * 8;
        if bits < MIN_RSA_BITS {
            return Err(Error::InvalidKey(format!(
                "RSA public key too small: {} bits (minimum {})",
                bits, MIN_RSA_BITS
            )));
        }

        let der = key
            .to_pkcs1_der()
            .map_err(|e| Error::InvalidKey(format!("Cannot encode RSA public key: {}", e)))?;

        Ok(Self {
            der: Arc::from(der.as_bytes()),
            bits,
        })
    }

    /// Create from a PKCS#1 `RSAPublicKey` DER encoding
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let key = rsa::RsaPublicKey::from_pkcs1_der(der)
            .map_err(|e| Error::InvalidKey(format!("Invalid PKCS#1 public key: {}", e)))?;
        Self::from_rsa(key)
    }

    /// Create from a DER `SubjectPublicKeyInfo`
    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let key = rsa::RsaPublicKey::from_public_key_der(der)
            .map_err(|e| Error::InvalidKey(format!("Invalid RSA public key: {}", e)))?;
        Self::from_rsa(key)
    }

    /// Create from a PEM encoded public key (SPKI or PKCS#1)
    pub fn from_pem(pem: &str) -> Result<Self> {
        let key = if pem.contains("BEGIN RSA PUBLIC KEY") {
            rsa::RsaPublicKey::from_pkcs1_pem(pem)
                .map_err(|e| Error::InvalidKey(format!("Invalid PKCS#1 public key: {}", e)))?
        } else if pem.contains("BEGIN PUBLIC KEY") {
            rsa::RsaPublicKey::from_public_key_pem(pem)
                .map_err(|e| Error::InvalidKey(format!("Invalid RSA public key: {}", e)))?
        } else {
            return Err(Error::InvalidKey("Unsupported public key PEM format".into()));
        };
        Self::from_rsa(key)
    }

    /// Extract the subject public key of a DER encoded X.509 certificate
    pub fn from_certificate_der(der: &[u8]) -> Result<Self> {
        let (_, cert) = x509_parser::parse_x509_certificate(der)
            .map_err(|e| Error::InvalidKey(format!("Invalid X.509 certificate: {:?}", e)))?;
        Self::from_spki_der(cert.public_key().raw)
    }

    /// PKCS#1 `RSAPublicKey` DER encoding
    pub fn as_pkcs1_der(&self) -> &[u8] {
        &self.der
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Verify `signature` over `message`
    ///
    /// Any rejection, including a signature of the wrong length, yields
    /// [`Error::CryptoError`].
    pub fn verify(
        &self,
        scheme: RsaSignatureScheme,
        message: &[u8],
        signature: &[u8],
    ) -> Result<()> {
        let public_key = UnparsedPublicKey::new(scheme.verification_parameters(), &self.der[..]);
        public_key
            .verify(message, signature)
            .map_err(|_| Error::CryptoError("RSA signature verification failed".into()))
    }
}

impl fmt::Debug for PublicKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeyHandle")
            .field("key_size_bits", &self.bits)
            .finish()
    }
}

/// RSA private key used to sign our own AUTH payload
///
/// The key pair is shared through an `Arc`; cloning does not copy secret material.
#[derive(Clone)]
pub struct PrivateKeyHandle {
    key_pair: Arc<RsaKeyPair>,
}

impl PrivateKeyHandle {
    /// Create from a PKCS#8 DER encoded private key
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let key_pair = RsaKeyPair::from_pkcs8(der)
            .map_err(|e| Error::InvalidKey(format!("Invalid RSA private key: {}", e)))?;

        Ok(Self {
            key_pair: Arc::new(key_pair),
        })
    }

    /// Create from a PEM encoded private key (PKCS#8 or PKCS#1)
    pub fn from_pem(pem: &str) -> Result<Self> {
        let key = if pem.contains("BEGIN RSA PRIVATE KEY") {
            rsa::RsaPrivateKey::from_pkcs1_pem(pem)
                .map_err(|e| Error::InvalidKey(format!("Invalid PKCS#1 private key: {}", e)))?
        } else if pem.contains("BEGIN PRIVATE KEY") {
            rsa::RsaPrivateKey::from_pkcs8_pem(pem)
                .map_err(|e| Error::InvalidKey(format!("Invalid PKCS#8 private key: {}", e)))?
        } else {
            return Err(Error::InvalidKey("Unsupported private key PEM format".into()));
        };

        // SecretDocument zeroizes its buffer on drop
        let der = key
            .to_pkcs8_der()
            .map_err(|e| Error::InvalidKey(format!("Cannot encode RSA private key: {}", e)))?;
        Self::from_pkcs8_der(der.as_bytes())
    }

    /// Public half of this key pair
    pub fn public_key(&self) -> Result<PublicKeyHandle> {
        PublicKeyHandle::from_pkcs1_der(self.key_pair.public().as_ref())
    }

    /// Modulus (and signature) length in bytes
    pub fn modulus_len(&self) -> usize {
        self.key_pair.public().modulus_len()
    }

    /// Sign `message`
    pub fn sign(&self, scheme: RsaSignatureScheme, message: &[u8]) -> Result<Vec<u8>> {
        let mut signature = vec![0u8; self.modulus_len()];
        let rng = SystemRandom::new();

        self.key_pair
            .sign(scheme.signing_encoding(), &rng, message, &mut signature)
            .map_err(|_| Error::CryptoError("RSA signing failed".into()))?;

        Ok(signature)
    }
}

impl fmt::Debug for PrivateKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyHandle")
            .field("key_size_bits", &(self.modulus_len() * 8))
            .finish()
    }
}
