//! IPSec peer authentication (IKEv2 IKE_AUTH)
//!
//! This module implements the part of IKEv2 (RFC 7296) that proves each
//! peer's identity once IKE_SA_INIT has produced shared keys:
//!
//! - **Signed octets**: the exact bytes each peer MACs or signs
//! - **Shared Key MIC**: pre-shared key authentication
//! - **RSA Digital Signature**: public key authentication with keys or X.509 certificates
//! - **Authenticator**: method selection and a four-outcome result
//!
//! # Architecture
//!
//! ```text
//! Authenticator (verify_auth_data / compute_auth_data)
//!   ├── ProtectedSession  (negotiated method, PRF, SK_pi / SK_pr, span)
//!   ├── SignedOctets      (message | nonce | prf(SK_p, IDx'))
//!   └── MethodRegistry
//!        ├── SharedKeyMicHandler ──┐
//!        └── RsaSignatureHandler ──┴── CredentialSource
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use ikeward_proto::ipsec::{
//!     AuthError, Authenticator, CredentialStore, IdPayload, IkeSession, PrfAlgorithm, Role,
//!     SaConfig,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = IdPayload::from_email("client@example.com");
//! let credentials = Arc::new(
//!     CredentialStore::builder()
//!         .with_shared_secret(client.clone(), b"my-secret-key".to_vec())
//!         .build(),
//! );
//!
//! let config = SaConfig::builder()
//!     .with_local_id(IdPayload::from_fqdn("gw.example.com"))
//!     .with_remote_id(client.clone())
//!     .build()?;
//!
//! // Responder side, after IKE_SA_INIT
//! let mut session = IkeSession::new_responder(config, credentials, [1; 8], [2; 8]);
//! session.derive_keys(PrfAlgorithm::HmacSha256, &[0x11; 32], &[0x22; 32], &[0x33; 256], 32, 32)?;
//!
//! let authenticator = Authenticator::new(&session);
//! # let init_request = [0u8; 64];
//! # let nonce_r = [0x22u8; 32];
//! # let auth = Authenticator::new(&session)
//! #     .compute_auth_data(&init_request, &nonce_r, &client, Role::Initiator)?;
//! match authenticator.verify_auth_data(&auth, &init_request, &nonce_r, &client, Role::Initiator) {
//!     Ok(()) => println!("{} authenticated", client),
//!     Err(err) => println!("send notify {}: {}", err.notify_type(), err),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! - [RFC 7296](https://datatracker.ietf.org/doc/html/rfc7296) - IKEv2 Protocol
//!
//! # Security
//!
//! - No unsafe code
//! - Constant-time MAC comparison
//! - Shared secrets and derived keys are zeroized when dropped
//! - Malformed AUTH data never panics

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod credentials;
pub mod crypto;
pub mod error;
pub mod ikev2;
pub mod logging;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use config::SaConfig;
pub use credentials::{CredentialSource, CredentialStore, SharedSecret};
pub use crypto::{PrfAlgorithm, PrivateKeyHandle, PublicKeyHandle, RsaSignatureScheme};
pub use error::{Error, Result};
pub use ikev2::{
    AuthError, AuthMethod, AuthPayload, Authenticator, IdPayload, IkeSession, ProtectedSession,
    Role,
};
