//! IKEv2 (Internet Key Exchange v2) peer authentication
//!
//! This module implements the IKE_AUTH authentication step of RFC 7296.
//!
//! # Protocol Overview
//!
//! After IKE_SA_INIT both peers share SK_pi and SK_pr. In IKE_AUTH each
//! peer proves its identity by sending an AUTH payload over its signed octets:
//!
//! ```text
//! Initiator                         Responder
//! -----------                       -----------
//! HDR, SA, KEi, Ni             -->
//!                              <--  HDR, SA, KEr, Nr
//! HDR, SK {IDi, AUTH, ...}     -->
//!                              <--  HDR, SK {IDr, AUTH, ...}
//! ```
//!
//! The AUTH value is either a MAC keyed by a pre-shared secret or an RSA
//! signature, selected by the negotiated [`AuthMethod`].
//!
//! # References
//!
//! - [RFC 7296](https://datatracker.ietf.org/doc/html/rfc7296) - IKEv2 Protocol

pub mod auth;
pub mod authenticator;
pub mod methods;
pub mod payload;
pub mod session;
pub mod state;

pub use auth::*;
pub use authenticator::*;
pub use methods::*;
pub use payload::*;
pub use session::*;
pub use state::*;
