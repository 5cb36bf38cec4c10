//! Credential lookup for IKEv2 authentication
//!
//! The authenticator never owns long-term secrets. It asks a [`CredentialSource`]
//! for the material bound to an identity, uses it for one computation and drops
//! its handle afterwards.
//!
//! [`CredentialStore`] is the in-memory source: it is assembled once through
//! [`CredentialStoreBuilder`] and is immutable afterwards, so any number of
//! sessions can share it behind an `Arc` and read from it concurrently.
//!
//! # Example
//!
//! ```rust
//! use ikeward_proto::ipsec::credentials::{CredentialSource, CredentialStore};
//! use ikeward_proto::ipsec::ikev2::IdPayload;
//!
//! let alice = IdPayload::from_email("alice@example.com");
//! let store = CredentialStore::builder()
//!     .with_shared_secret(alice.clone(), b"test-psk".to_vec())
//!     .build();
//!
//! assert!(store.lookup_shared_secret(&alice).is_some());
//! assert!(store.lookup_private_key(&alice).is_none());
//! ```

use super::crypto::{PrivateKeyHandle, PublicKeyHandle};
use super::ikev2::IdPayload;
use super::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Pre-shared secret
///
/// Clones share one buffer; the bytes are zeroized when the last clone is dropped.
#[derive(Clone)]
pub struct SharedSecret {
    bytes: Arc<Zeroizing<Vec<u8>>>,
}

impl SharedSecret {
    /// Wrap secret bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::new(Zeroizing::new(bytes.into())),
        }
    }

    /// Secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Secret length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the secret is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Source of credentials keyed by IKE identity
///
/// Implementations must tolerate concurrent lookups from many sessions.
pub trait CredentialSource: Send + Sync {
    /// Shared secret used with `identity`
    fn lookup_shared_secret(&self, identity: &IdPayload) -> Option<SharedSecret>;

    /// Trusted public key (configured or from a certificate) of `identity`
    fn lookup_public_key(&self, identity: &IdPayload) -> Option<PublicKeyHandle>;

    /// Our private key for `identity`
    fn lookup_private_key(&self, identity: &IdPayload) -> Option<PrivateKeyHandle>;
}

/// Immutable in-memory credential store
#[derive(Default)]
pub struct CredentialStore {
    shared_secrets: HashMap<IdPayload, SharedSecret>,
    public_keys: HashMap<IdPayload, PublicKeyHandle>,
    private_keys: HashMap<IdPayload, PrivateKeyHandle>,
}

impl CredentialStore {
    /// Create builder for a credential store
    pub fn builder() -> CredentialStoreBuilder {
        CredentialStoreBuilder::new()
    }

    /// Total number of credentials held
    pub fn len(&self) -> usize {
        self.shared_secrets.len() + self.public_keys.len() + self.private_keys.len()
    }

    /// Whether the store holds no credentials
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialSource for CredentialStore {
    fn lookup_shared_secret(&self, identity: &IdPayload) -> Option<SharedSecret> {
        self.shared_secrets.get(identity).cloned()
    }

    fn lookup_public_key(&self, identity: &IdPayload) -> Option<PublicKeyHandle> {
        self.public_keys.get(identity).cloned()
    }

    fn lookup_private_key(&self, identity: &IdPayload) -> Option<PrivateKeyHandle> {
        self.private_keys.get(identity).cloned()
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("shared_secrets", &self.shared_secrets.len())
            .field("public_keys", &self.public_keys.len())
            .field("private_keys", &self.private_keys.len())
            .finish()
    }
}

/// Builder for CredentialStore
///
/// Registering a second credential of the same kind for an identity replaces the first.
#[derive(Default)]
pub struct CredentialStoreBuilder {
    store: CredentialStore,
}

impl CredentialStoreBuilder {
    /// Create new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared secret for an identity
    pub fn with_shared_secret(mut self, identity: IdPayload, secret: impl Into<Vec<u8>>) -> Self {
        self.store
            .shared_secrets
            .insert(identity, SharedSecret::new(secret));
        self
    }

    /// Register a trusted public key for a peer identity
    pub fn with_public_key(mut self, identity: IdPayload, key: PublicKeyHandle) -> Self {
        self.store.public_keys.insert(identity, key);
        self
    }

    /// Register a trusted PEM public key for a peer identity
    pub fn with_public_key_pem(self, identity: IdPayload, pem: &str) -> Result<Self> {
        let key = PublicKeyHandle::from_pem(pem)?;
        Ok(self.with_public_key(identity, key))
    }

    /// Register the public key of a DER X.509 certificate for a peer identity
    pub fn with_certificate_der(self, identity: IdPayload, der: &[u8]) -> Result<Self> {
        let key = PublicKeyHandle::from_certificate_der(der)?;
        Ok(self.with_public_key(identity, key))
    }

    /// Register our private key for an identity
    pub fn with_private_key(mut self, identity: IdPayload, key: PrivateKeyHandle) -> Self {
        self.store.private_keys.insert(identity, key);
        self
    }

    /// Register our PEM private key for an identity
    pub fn with_private_key_pem(self, identity: IdPayload, pem: &str) -> Result<Self> {
        let key = PrivateKeyHandle::from_pem(pem)?;
        Ok(self.with_private_key(identity, key))
    }

    /// Finish the store
    pub fn build(self) -> CredentialStore {
        self.store
    }
}
