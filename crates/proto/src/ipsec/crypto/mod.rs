//! IPSec cryptographic operations
//!
//! This module provides the cryptographic primitives used for IKEv2 peer
//! authentication:
//! - PRF (Pseudo-Random Functions) and `prf+`
//! - Key derivation of SK_d, SK_a, SK_e and SK_p keys
//! - RSA signatures for AUTH payloads

pub mod prf;
pub mod signature;

pub use prf::*;
pub use signature::{PrivateKeyHandle, PublicKeyHandle, RsaSignatureScheme};
