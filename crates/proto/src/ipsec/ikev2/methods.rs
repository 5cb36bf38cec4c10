//! Authentication method handlers
//!
//! Each IKEv2 authentication method is an [`AuthMethodHandler`]. The
//! authenticator picks the handler for the negotiated method from a
//! [`MethodRegistry`], so adding a method means registering a handler.

use super::auth::{compute_shared_key_mic, verify_shared_key_mic, SignedOctets};
use super::authenticator::{fail_closed, AuthError};
use super::payload::{AuthMethod, AuthPayload, IdPayload};
use crate::ipsec::credentials::CredentialSource;
use crate::ipsec::crypto::{PrfAlgorithm, RsaSignatureScheme};
use crate::ipsec::logging;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Session services available to a handler for one call
#[derive(Clone, Copy)]
pub struct MethodContext<'a> {
    /// Negotiated PRF
    pub prf: PrfAlgorithm,

    /// Credential lookup
    pub credentials: &'a dyn CredentialSource,
}

/// One IKEv2 authentication method
pub trait AuthMethodHandler: Send + Sync {
    /// Method implemented by this handler
    fn method(&self) -> AuthMethod;

    /// Check `auth_data` received from `peer` over `signed_octets`
    fn verify(
        &self,
        ctx: &MethodContext<'_>,
        signed_octets: &SignedOctets,
        auth_data: &[u8],
        peer: &IdPayload,
    ) -> Result<(), AuthError>;

    /// Produce our AUTH payload over `signed_octets`
    fn compute(
        &self,
        ctx: &MethodContext<'_>,
        signed_octets: &SignedOctets,
        own: &IdPayload,
    ) -> Result<AuthPayload, AuthError>;
}

/// Shared Key Message Integrity Code (auth method 2)
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedKeyMicHandler;

impl AuthMethodHandler for SharedKeyMicHandler {
    fn method(&self) -> AuthMethod {
        AuthMethod::SharedKeyMic
    }

    fn verify(
        &self,
        ctx: &MethodContext<'_>,
        signed_octets: &SignedOctets,
        auth_data: &[u8],
        peer: &IdPayload,
    ) -> Result<(), AuthError> {
        let secret = ctx.credentials.lookup_shared_secret(peer).ok_or_else(|| {
            logging::log_credential_not_found(&peer.to_string(), "shared secret");
            AuthError::NotFound
        })?;

        let valid = verify_shared_key_mic(ctx.prf, secret.as_bytes(), signed_octets, auth_data)
            .map_err(fail_closed)?;

        if valid {
            Ok(())
        } else {
            Err(AuthError::Failed)
        }
    }

    fn compute(
        &self,
        ctx: &MethodContext<'_>,
        signed_octets: &SignedOctets,
        own: &IdPayload,
    ) -> Result<AuthPayload, AuthError> {
        let secret = ctx.credentials.lookup_shared_secret(own).ok_or_else(|| {
            logging::log_credential_not_found(&own.to_string(), "shared secret");
            AuthError::NotFound
        })?;

        let mic = compute_shared_key_mic(ctx.prf, secret.as_bytes(), signed_octets)
            .map_err(fail_closed)?;

        Ok(AuthPayload::new(AuthMethod::SharedKeyMic, mic))
    }
}

/// RSA Digital Signature (auth method 1), RSASSA-PKCS1-v1_5
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaSignatureHandler {
    scheme: RsaSignatureScheme,
}

impl RsaSignatureHandler {
    /// Create handler signing and verifying with `scheme`
    pub fn new(scheme: RsaSignatureScheme) -> Self {
        Self { scheme }
    }
}

impl AuthMethodHandler for RsaSignatureHandler {
    fn method(&self) -> AuthMethod {
        AuthMethod::RsaSig
    }

    fn verify(
        &self,
        ctx: &MethodContext<'_>,
        signed_octets: &SignedOctets,
        auth_data: &[u8],
        peer: &IdPayload,
    ) -> Result<(), AuthError> {
        let public_key = ctx.credentials.lookup_public_key(peer).ok_or_else(|| {
            logging::log_credential_not_found(&peer.to_string(), "public key");
            AuthError::NotFound
        })?;

        public_key
            .verify(self.scheme, signed_octets.as_bytes(), auth_data)
            .map_err(|_| AuthError::Failed)
    }

    fn compute(
        &self,
        ctx: &MethodContext<'_>,
        signed_octets: &SignedOctets,
        own: &IdPayload,
    ) -> Result<AuthPayload, AuthError> {
        let private_key = ctx.credentials.lookup_private_key(own).ok_or_else(|| {
            logging::log_credential_not_found(&own.to_string(), "private key");
            AuthError::NotFound
        })?;

        let signature = private_key
            .sign(self.scheme, signed_octets.as_bytes())
            .map_err(fail_closed)?;

        Ok(AuthPayload::new(AuthMethod::RsaSig, signature))
    }
}

/// Handlers keyed by authentication method
#[derive(Clone)]
pub struct MethodRegistry {
    handlers: HashMap<AuthMethod, Arc<dyn AuthMethodHandler>>,
}

impl MethodRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with shared key MIC and RSA (SHA-256) signatures
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SharedKeyMicHandler));
        registry.register(Arc::new(RsaSignatureHandler::default()));
        registry
    }

    /// Register a handler, returning the one it replaces
    pub fn register(
        &mut self,
        handler: Arc<dyn AuthMethodHandler>,
    ) -> Option<Arc<dyn AuthMethodHandler>> {
        self.handlers.insert(handler.method(), handler)
    }

    /// Handler for `method`
    pub fn get(&self, method: AuthMethod) -> Option<&Arc<dyn AuthMethodHandler>> {
        self.handlers.get(&method)
    }

    /// Whether `method` has a handler
    pub fn supports(&self, method: AuthMethod) -> bool {
        self.handlers.contains_key(&method)
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.handlers.keys().map(|m| m.name()).collect();
        methods.sort_unstable();
        f.debug_struct("MethodRegistry")
            .field("methods", &methods)
            .finish()
    }
}
