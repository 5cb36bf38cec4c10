//! IKEv2 Authentication primitives
//!
//! Implements the signed octets construction and the shared key MIC as
//! defined in RFC 7296 Section 2.15.

use super::payload::IdPayload;
use super::session::KeyedPrf;
use crate::ipsec::crypto::PrfAlgorithm;
use crate::ipsec::Result;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Key pad for IKEv2 (RFC 7296 Section 2.15)
pub const KEY_PAD_IKEV2: &[u8] = b"Key Pad for IKEv2";

/// The octets a party MACs or signs in its AUTH payload
///
/// ```text
/// InitiatorSignedOctets = RealMessage1 | NonceRData | prf(SK_pi, IDi')
/// ResponderSignedOctets = RealMessage2 | NonceIData | prf(SK_pr, IDr')
/// ```
///
/// Built fresh for every computation or verification; it is bound to one
/// specific exchanged message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedOctets(Vec<u8>);

impl SignedOctets {
    /// Assemble signed octets
    ///
    /// # Arguments
    ///
    /// * `last_message` - Raw bytes of the party's IKE_SA_INIT message, as sent on the wire
    /// * `nonce` - Nonce data of the *other* party
    /// * `identity` - ID payload of the party being authenticated
    /// * `prf` - PRF keyed with that party's SK_p
    ///
    /// The identity is fed to the PRF as `IDx'`, the ID payload body without
    /// the generic payload header, taken verbatim from the decoded payload.
    pub fn build(
        last_message: &[u8],
        nonce: &[u8],
        identity: &IdPayload,
        prf: &KeyedPrf<'_>,
    ) -> Result<Self> {
        let id_hash = prf.compute(&identity.to_payload_data())?;

        let mut octets = Vec::with_capacity(last_message.len() + nonce.len() + id_hash.len());
        octets.extend_from_slice(last_message);
        octets.extend_from_slice(nonce);
        octets.extend_from_slice(&id_hash);

        Ok(SignedOctets(octets))
    }

    /// Signed octets bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the octets are empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for SignedOctets {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Compute the shared key MIC (RFC 7296 Section 2.15)
///
/// ```text
/// AUTH = prf(prf(Shared Secret, "Key Pad for IKEv2"), <SignedOctets>)
/// ```
pub fn compute_shared_key_mic(
    prf_alg: PrfAlgorithm,
    secret: &[u8],
    signed_octets: &SignedOctets,
) -> Result<Vec<u8>> {
    // prf(Shared Secret, "Key Pad for IKEv2") is as sensitive as the secret
    let padded_key = Zeroizing::new(prf_alg.compute(secret, KEY_PAD_IKEV2)?);
    prf_alg.compute(&padded_key, signed_octets.as_bytes())
}

/// Check a received shared key MIC
///
/// The comparison runs in constant time; a value of the wrong length never matches.
pub fn verify_shared_key_mic(
    prf_alg: PrfAlgorithm,
    secret: &[u8],
    signed_octets: &SignedOctets,
    received: &[u8],
) -> Result<bool> {
    let expected = compute_shared_key_mic(prf_alg, secret, signed_octets)?;
    Ok(expected.as_slice().ct_eq(received).into())
}
