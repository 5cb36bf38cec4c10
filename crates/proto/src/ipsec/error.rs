//! Error types for IKEv2 authentication
//!
//! This module defines the internal error type shared by the payload codec,
//! the crypto primitives, the credential store and the session context.
//!
//! Authentication outcomes reported to the negotiation state machine use the
//! narrower [`AuthError`](crate::ipsec::ikev2::AuthError) taxonomy instead; the
//! authenticator maps every [`Error`] onto it and never lets one escape.

use std::fmt;

/// Result type for IPSec operations
pub type Result<T> = std::result::Result<T, Error>;

/// IPSec protocol errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid IKEv2 payload
    InvalidPayload(String),

    /// Buffer too short for operation
    BufferTooShort {
        /// Required length
        required: usize,
        /// Available length
        available: usize,
    },

    /// Invalid configuration parameter
    InvalidParameter(String),

    /// Cryptographic operation failed
    CryptoError(String),

    /// Key material could not be decoded or was rejected
    InvalidKey(String),

    /// Session has not completed key derivation
    NotReady(String),

    /// State machine error
    InvalidState(String),

    /// Invalid state transition
    InvalidStateTransition {
        /// State the session was in
        from: String,
        /// State that was requested
        to: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPayload(msg) => write!(f, "Invalid IKE payload: {}", msg),
            Error::BufferTooShort {
                required,
                available,
            } => {
                write!(
                    f,
                    "Buffer too short: need {} bytes, have {}",
                    required, available
                )
            }
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            Error::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
            Error::NotReady(msg) => write!(f, "Session not ready: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::InvalidStateTransition { from, to } => {
                write!(f, "Invalid state transition from {} to {}", from, to)
            }
        }
    }
}

impl std::error::Error for Error {}
