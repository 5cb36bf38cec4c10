//! Protocol implementations for the Ikeward IKEv2 authentication stack.
//!
//! This crate provides the peer authentication step of IKEv2:
//!
//! - **IKE_AUTH** (RFC 7296 Section 2.15) - AUTH payload computation and verification
//!   with pre-shared keys or RSA signatures
//!
//! # Features
//!
//! - `ipsec` (default) - IKEv2 authentication support
//!
//! # Example
//!
//! ```rust
//! use ikeward_proto::ipsec::ikev2::AuthPayload;
//! use ikeward_proto::ipsec::AuthMethod;
//!
//! // Decode an AUTH payload body received from a peer
//! let body = [0x02, 0x00, 0x00, 0x00, 0xde, 0xad, 0xbe, 0xef];
//! let auth = AuthPayload::from_payload_data(&body).unwrap();
//! assert_eq!(auth.auth_method, AuthMethod::SharedKeyMic);
//! assert_eq!(auth.auth_data, [0xde, 0xad, 0xbe, 0xef]);
//! ```
//!
//! # Security
//!
//! - All cryptographic operations use vetted libraries (`ring`, RustCrypto)
//! - Constant-time operations for authentication
//! - Secure memory handling with `zeroize`
//! - Fuzz testing of attacker-controlled payload bodies
//!
//! # References
//!
//! - [RFC 7296](https://datatracker.ietf.org/doc/html/rfc7296) - Internet Key Exchange Protocol Version 2
//! - [RFC 8017](https://datatracker.ietf.org/doc/html/rfc8017) - PKCS #1: RSA Cryptography Specifications

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

#[cfg(feature = "ipsec")]
pub mod ipsec;
