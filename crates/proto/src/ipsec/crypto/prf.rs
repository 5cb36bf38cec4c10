//! Pseudo-Random Function (PRF) implementations
//!
//! Implements the IKEv2 PRFs (RFC 7296 Section 2.13) and the derivation of the
//! IKE SA keys from SKEYSEED (RFC 7296 Section 2.14).

use crate::ipsec::{Error, Result};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// PRF algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrfAlgorithm {
    /// HMAC-SHA1 (legacy peers)
    HmacSha1,
    /// HMAC-SHA2-256
    HmacSha256,
    /// HMAC-SHA2-384
    HmacSha384,
    /// HMAC-SHA2-512
    HmacSha512,
}

impl PrfAlgorithm {
    /// Map an IKEv2 PRF transform ID (IANA "Transform Type 2") to an algorithm
    pub fn from_transform_id(id: u16) -> Option<Self> {
        match id {
            2 => Some(PrfAlgorithm::HmacSha1),
            5 => Some(PrfAlgorithm::HmacSha256),
            6 => Some(PrfAlgorithm::HmacSha384),
            7 => Some(PrfAlgorithm::HmacSha512),
            _ => None,
        }
    }

    /// IKEv2 PRF transform ID
    pub fn transform_id(self) -> u16 {
        match self {
            PrfAlgorithm::HmacSha1 => 2,
            PrfAlgorithm::HmacSha256 => 5,
            PrfAlgorithm::HmacSha384 => 6,
            PrfAlgorithm::HmacSha512 => 7,
        }
    }

    /// Get PRF output length in bytes
    pub fn output_len(self) -> usize {
        match self {
            PrfAlgorithm::HmacSha1 => 20,
            PrfAlgorithm::HmacSha256 => 32,
            PrfAlgorithm::HmacSha384 => 48,
            PrfAlgorithm::HmacSha512 => 64,
        }
    }

    /// Compute PRF
    ///
    /// # Arguments
    ///
    /// * `key` - PRF key
    /// * `data` - Input data
    ///
    /// # Returns
    ///
    /// Returns PRF output of [`output_len`](Self::output_len) bytes
    pub fn compute(self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        let output = match self {
            PrfAlgorithm::HmacSha1 => {
                let mut mac = Hmac::<Sha1>::new_from_slice(key).map_err(invalid_key)?;
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            PrfAlgorithm::HmacSha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(invalid_key)?;
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            PrfAlgorithm::HmacSha384 => {
                let mut mac = Hmac::<Sha384>::new_from_slice(key).map_err(invalid_key)?;
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            PrfAlgorithm::HmacSha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(key).map_err(invalid_key)?;
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
        };
        Ok(output)
    }

    /// Compute prf+ (key expansion function)
    ///
    /// Defined in RFC 7296 Section 2.13:
    /// ```text
    /// prf+ (K,S) = T1 | T2 | T3 | T4 | ...
    ///
    /// where:
    /// T1 = prf (K, S | 0x01)
    /// T2 = prf (K, T1 | S | 0x02)
    /// T3 = prf (K, T2 | S | 0x03)
    /// T4 = prf (K, T3 | S | 0x04)
    /// ...
    /// ```
    ///
    /// The one-octet counter limits the output to 255 PRF blocks.
    pub fn prf_plus(self, key: &[u8], seed: &[u8], output_len: usize) -> Result<Vec<u8>> {
        let max_len = 255 * self.output_len();
        if output_len > max_len {
            return Err(Error::CryptoError(format!(
                "prf+ output of {} bytes exceeds maximum {}",
                output_len, max_len
            )));
        }

        let mut output = Vec::with_capacity(output_len);
        let mut t = Zeroizing::new(Vec::new());
        let mut counter: u8 = 1;

        while output.len() < output_len {
            let mut input = Zeroizing::new(Vec::with_capacity(t.len() + seed.len() + 1));
            input.extend_from_slice(&t);
            input.extend_from_slice(seed);
            input.push(counter);

            t = Zeroizing::new(self.compute(key, &input)?);
            output.extend_from_slice(&t);

            counter = counter.wrapping_add(1);
        }

        output.truncate(output_len);
        Ok(output)
    }
}

fn invalid_key(err: hmac::digest::InvalidLength) -> Error {
    Error::CryptoError(format!("PRF key rejected: {}", err))
}

/// IKEv2 key material derived from SKEYSEED
///
/// Contains all keys derived during the IKE_SA_INIT exchange. Every key is
/// zeroized when the value is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    /// SK_d - Key for deriving Child SA keys
    pub sk_d: Vec<u8>,

    /// SK_ai - Initiator's integrity key
    pub sk_ai: Vec<u8>,

    /// SK_ar - Responder's integrity key
    pub sk_ar: Vec<u8>,

    /// SK_ei - Initiator's encryption key
    pub sk_ei: Vec<u8>,

    /// SK_er - Responder's encryption key
    pub sk_er: Vec<u8>,

    /// SK_pi - Initiator's AUTH payload key
    pub sk_pi: Vec<u8>,

    /// SK_pr - Responder's AUTH payload key
    pub sk_pr: Vec<u8>,
}

impl KeyMaterial {
    /// Derive IKEv2 key material from SKEYSEED
    ///
    /// Implements key derivation from RFC 7296 Section 2.14:
    /// ```text
    /// SKEYSEED = prf(Ni | Nr, g^ir)
    ///
    /// {SK_d | SK_ai | SK_ar | SK_ei | SK_er | SK_pi | SK_pr}
    ///     = prf+ (SKEYSEED, Ni | Nr | SPIi | SPIr)
    /// ```
    ///
    /// # Arguments
    ///
    /// * `prf_alg` - PRF algorithm to use
    /// * `nonce_i` - Initiator's nonce
    /// * `nonce_r` - Responder's nonce
    /// * `shared_secret` - DH shared secret (g^ir)
    /// * `spi_i` - Initiator's SPI
    /// * `spi_r` - Responder's SPI
    /// * `encr_key_len` - Encryption key length in bytes
    /// * `integ_key_len` - Integrity key length in bytes
    pub fn derive(
        prf_alg: PrfAlgorithm,
        nonce_i: &[u8],
        nonce_r: &[u8],
        shared_secret: &[u8],
        spi_i: &[u8; 8],
        spi_r: &[u8; 8],
        encr_key_len: usize,
        integ_key_len: usize,
    ) -> Result<Self> {
        let mut prf_key = Zeroizing::new(Vec::with_capacity(nonce_i.len() + nonce_r.len()));
        prf_key.extend_from_slice(nonce_i);
        prf_key.extend_from_slice(nonce_r);

        let skeyseed = Zeroizing::new(prf_alg.compute(&prf_key, shared_secret)?);

        let mut seed = Vec::with_capacity(nonce_i.len() + nonce_r.len() + 16);
        seed.extend_from_slice(nonce_i);
        seed.extend_from_slice(nonce_r);
        seed.extend_from_slice(spi_i);
        seed.extend_from_slice(spi_r);

        let prf_len = prf_alg.output_len();
        let total_len = [
            prf_len,       // SK_d
            integ_key_len, // SK_ai
            integ_key_len, // SK_ar
            encr_key_len,  // SK_ei
            encr_key_len,  // SK_er
            prf_len,       // SK_pi
            prf_len,       // SK_pr
        ]
        .iter()
        .try_fold(0usize, |acc, &len| acc.checked_add(len))
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "Key lengths too large: encr {}, integ {}",
                encr_key_len, integ_key_len
            ))
        })?;

        let keymat = Zeroizing::new(prf_alg.prf_plus(&skeyseed, &seed, total_len)?);

        let mut offset = 0;
        let mut take = |len: usize| {
            let key = keymat[offset..offset + len].to_vec();
            offset += len;
            key
        };

        Ok(KeyMaterial {
            sk_d: take(prf_len),
            sk_ai: take(integ_key_len),
            sk_ar: take(integ_key_len),
            sk_ei: take(encr_key_len),
            sk_er: take(encr_key_len),
            sk_pi: take(prf_len),
            sk_pr: take(prf_len),
        })
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("sk_d_len", &self.sk_d.len())
            .field("sk_a_len", &self.sk_ai.len())
            .field("sk_e_len", &self.sk_ei.len())
            .field("sk_p_len", &self.sk_pi.len())
            .finish_non_exhaustive()
    }
}
