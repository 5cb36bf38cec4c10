//! IKE_AUTH peer authentication
//!
//! The [`Authenticator`] computes our AUTH payload and verifies the peer's
//! during IKE_AUTH (RFC 7296 Section 2.15). It selects the handler for the
//! negotiated method, builds the signed octets for the right party and maps
//! every failure onto [`AuthError`].
//!
//! # Roles
//!
//! ```text
//! compute_auth_data(last_sent_message, other_nonce, my_id, my_role)
//!     signed octets = my message | peer nonce | prf(SK_p{my_role}, my IDx')
//!
//! verify_auth_data(auth, last_received_message, my_nonce, other_id, other_role)
//!     signed octets = peer message | my nonce | prf(SK_p{other_role}, peer IDx')
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ikeward_proto::ipsec::config::SaConfig;
//! use ikeward_proto::ipsec::credentials::CredentialStore;
//! use ikeward_proto::ipsec::crypto::PrfAlgorithm;
//! use ikeward_proto::ipsec::ikev2::{Authenticator, IdPayload, IkeSession, Role};
//!
//! let alice = IdPayload::from_email("alice@example.com");
//! let store = CredentialStore::builder()
//!     .with_shared_secret(alice.clone(), b"test-psk".to_vec())
//!     .build();
//! let config = SaConfig::builder().with_local_id(alice.clone()).build()?;
//!
//! let mut session = IkeSession::new_responder(config, Arc::new(store), [1; 8], [2; 8]);
//! session.derive_keys(PrfAlgorithm::HmacSha256, &[1; 32], &[2; 32], &[3; 256], 32, 32)?;
//!
//! let authenticator = Authenticator::new(&session);
//! let nonce: Vec<u8> = (0x01..=0x10).collect();
//! let auth = authenticator.compute_auth_data(&[0u8; 64], &nonce, &alice, Role::Initiator)?;
//! authenticator.verify_auth_data(&auth, &[0u8; 64], &nonce, &alice, Role::Initiator)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::auth::SignedOctets;
use super::methods::{AuthMethodHandler, MethodContext, MethodRegistry};
use super::payload::{AuthMethod, AuthPayload, IdPayload, NoncePayload};
use super::session::{ProtectedSession, Role};
use crate::ipsec::{logging, Error};
use std::fmt;
use std::sync::Arc;

/// AUTHENTICATION_FAILED notify message type (RFC 7296 Section 3.10.1)
pub const AUTHENTICATION_FAILED: u16 = 24;

/// Why authentication did not succeed
///
/// The variants are for local diagnostics only. The peer is always sent the
/// same AUTHENTICATION_FAILED notification, see [`notify_type`](Self::notify_type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthError {
    /// Credentials were found but the MAC or signature did not check out
    Failed,

    /// No handler is registered for the negotiated method
    NotSupported,

    /// No credential (or trusted key) is available for the identity
    NotFound,
}

impl AuthError {
    /// Notify message type to send to the peer
    pub fn notify_type(self) -> u16 {
        AUTHENTICATION_FAILED
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Failed => write!(f, "Authentication failed"),
            AuthError::NotSupported => write!(f, "Authentication method not supported"),
            AuthError::NotFound => write!(f, "Credential not found"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Map an internal error onto the taxonomy without ever failing open
pub(crate) fn fail_closed(err: Error) -> AuthError {
    tracing::debug!(error = %err, "AUTH computation error");
    AuthError::Failed
}

/// Computes and verifies AUTH payloads for one IKE SA
pub struct Authenticator<'a, S: ProtectedSession + ?Sized> {
    session: &'a S,
    registry: Arc<MethodRegistry>,
}

impl<'a, S: ProtectedSession + ?Sized> Authenticator<'a, S> {
    /// Create authenticator with the default methods (PSK, RSA)
    pub fn new(session: &'a S) -> Self {
        Self::with_registry(session, Arc::new(MethodRegistry::with_defaults()))
    }

    /// Create authenticator with a custom set of methods
    pub fn with_registry(session: &'a S, registry: Arc<MethodRegistry>) -> Self {
        Self { session, registry }
    }

    /// Verify the peer's AUTH payload
    ///
    /// # Arguments
    ///
    /// * `auth_payload` - Decoded AUTH payload received from the peer
    /// * `last_received_message` - Raw IKE_SA_INIT message the peer sent
    /// * `my_nonce` - Nonce we sent
    /// * `other_id` - ID payload the peer sent
    /// * `other_role` - Role of the peer
    pub fn verify_auth_data(
        &self,
        auth_payload: &AuthPayload,
        last_received_message: &[u8],
        my_nonce: &[u8],
        other_id: &IdPayload,
        other_role: Role,
    ) -> Result<(), AuthError> {
        self.session.span().in_scope(|| {
            let peer = other_id.to_string();
            let result = self.verify_inner(
                auth_payload,
                last_received_message,
                my_nonce,
                other_id,
                other_role,
            );

            match result {
                Ok(method) => {
                    logging::log_authentication_success(&peer, method.name());
                    Ok(())
                }
                Err(err) => {
                    logging::log_authentication_failed(&peer, &err.to_string());
                    Err(err)
                }
            }
        })
    }

    /// Compute our AUTH payload
    ///
    /// # Arguments
    ///
    /// * `last_sent_message` - Raw IKE_SA_INIT message we sent
    /// * `other_nonce` - Nonce the peer sent
    /// * `my_id` - ID payload we send
    /// * `my_role` - Our role
    pub fn compute_auth_data(
        &self,
        last_sent_message: &[u8],
        other_nonce: &[u8],
        my_id: &IdPayload,
        my_role: Role,
    ) -> Result<AuthPayload, AuthError> {
        self.session.span().in_scope(|| {
            let local = my_id.to_string();
            let result = self.compute_inner(last_sent_message, other_nonce, my_id, my_role);

            match &result {
                Ok(payload) => logging::log_auth_data_computed(
                    &local,
                    payload.auth_method.name(),
                    payload.auth_data.len(),
                ),
                Err(err) => logging::log_auth_data_failed(&local, &err.to_string()),
            }
            result
        })
    }

    fn verify_inner(
        &self,
        auth_payload: &AuthPayload,
        last_received_message: &[u8],
        my_nonce: &[u8],
        other_id: &IdPayload,
        other_role: Role,
    ) -> Result<AuthMethod, AuthError> {
        let (handler, ctx) = self.select_handler("verify")?;
        let method = handler.method();

        if auth_payload.auth_method != method {
            tracing::debug!(
                received = auth_payload.auth_method.name(),
                negotiated = method.name(),
                "AUTH method mismatch"
            );
            return Err(AuthError::Failed);
        }

        if !self.session.config().accepts_peer(other_id) {
            logging::log_credential_not_found(&other_id.to_string(), "trusted identity");
            return Err(AuthError::NotFound);
        }

        let signed_octets =
            self.signed_octets("verify", last_received_message, my_nonce, other_id, other_role)?;

        handler.verify(&ctx, &signed_octets, &auth_payload.auth_data, other_id)?;
        Ok(method)
    }

    fn compute_inner(
        &self,
        last_sent_message: &[u8],
        other_nonce: &[u8],
        my_id: &IdPayload,
        my_role: Role,
    ) -> Result<AuthPayload, AuthError> {
        let (handler, ctx) = self.select_handler("compute")?;

        let signed_octets =
            self.signed_octets("compute", last_sent_message, other_nonce, my_id, my_role)?;

        handler.compute(&ctx, &signed_octets, my_id)
    }

    fn select_handler(
        &self,
        operation: &str,
    ) -> Result<(Arc<dyn AuthMethodHandler>, MethodContext<'a>), AuthError> {
        let method = self
            .session
            .auth_method()
            .map_err(|e| session_failure(operation, e))?;

        let handler = self.registry.get(method).cloned().ok_or_else(|| {
            logging::log_auth_method_unsupported(method.name());
            AuthError::NotSupported
        })?;

        let prf = self
            .session
            .prf()
            .map_err(|e| session_failure(operation, e))?;

        let session: &'a S = self.session;
        let ctx = MethodContext {
            prf,
            credentials: session.credentials(),
        };
        Ok((handler, ctx))
    }

    fn signed_octets(
        &self,
        operation: &str,
        message: &[u8],
        nonce: &[u8],
        identity: &IdPayload,
        party: Role,
    ) -> Result<SignedOctets, AuthError> {
        let prf = self
            .session
            .signing_prf(party)
            .map_err(|e| session_failure(operation, e))?;

        NoncePayload::check_len(nonce).map_err(fail_closed)?;
        let signed_octets =
            SignedOctets::build(message, nonce, identity, &prf).map_err(fail_closed)?;

        logging::log_signed_octets(party.name(), message.len(), nonce.len(), signed_octets.len());
        Ok(signed_octets)
    }
}

/// Session accessor failures: an unready session has no credentials to offer
fn session_failure(operation: &str, err: Error) -> AuthError {
    match err {
        Error::NotReady(reason) => {
            logging::log_session_not_ready(operation, &reason);
            AuthError::NotFound
        }
        other => fail_closed(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipsec::config::SaConfig;
    use crate::ipsec::credentials::{CredentialSource, CredentialStore};
    use crate::ipsec::crypto::PrfAlgorithm;
    use crate::ipsec::ikev2::{IdType, IkeSession, IkeState};
    use crate::ipsec::testutil::{ALICE_KEY_PEM, ALICE_PUB_PEM, MALLORY_PUB_PEM};

    const MESSAGE: [u8; 64] = [0u8; 64];

    fn nonce() -> Vec<u8> {
        (0x01..=0x10).collect()
    }

    fn alice() -> IdPayload {
        IdPayload::from_email("alice@example.com")
    }

    fn new_session(method: AuthMethod, store: CredentialStore) -> IkeSession {
        let config = SaConfig::builder()
            .with_local_id(alice())
            .with_auth_method(method)
            .build()
            .unwrap();
        let credentials: Arc<dyn CredentialSource> = Arc::new(store);
        IkeSession::new_responder(config, credentials, [0x11; 8], [0x22; 8])
    }

    fn ready_session(method: AuthMethod, store: CredentialStore) -> IkeSession {
        let mut session = new_session(method, store);
        session
            .derive_keys(
                PrfAlgorithm::HmacSha256,
                &[0xAA; 32],
                &[0xBB; 32],
                &[0xCC; 256],
                32,
                32,
            )
            .unwrap();
        session
    }

    fn psk_store() -> CredentialStore {
        CredentialStore::builder()
            .with_shared_secret(alice(), b"test-psk".to_vec())
            .build()
    }

    fn rsa_store(public_pem: Option<&str>) -> CredentialStore {
        let mut builder = CredentialStore::builder()
            .with_private_key_pem(alice(), ALICE_KEY_PEM)
            .unwrap();
        if let Some(pem) = public_pem {
            builder = builder.with_public_key_pem(alice(), pem).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_psk_round_trip_and_role_binding() {
        let session = ready_session(AuthMethod::SharedKeyMic, psk_store());
        let authenticator = Authenticator::new(&session);

        let auth = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
            .unwrap();
        assert_eq!(auth.auth_method, AuthMethod::SharedKeyMic);
        assert_eq!(auth.auth_data.len(), 32);

        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Ok(())
        );
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Responder),
            Err(AuthError::Failed)
        );
    }

    #[test]
    fn test_psk_responder_direction() {
        let session = ready_session(AuthMethod::SharedKeyMic, psk_store());
        let authenticator = Authenticator::new(&session);

        let auth = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Responder)
            .unwrap();
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Responder),
            Ok(())
        );
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Err(AuthError::Failed)
        );
    }

    #[test]
    fn test_psk_sensitive_to_every_input() {
        // The flipped identity gets the same secret so only the signed octets differ
        let mut flipped_id = alice();
        flipped_id.data[0] ^= 0x01;
        let store = CredentialStore::builder()
            .with_shared_secret(alice(), b"test-psk".to_vec())
            .with_shared_secret(flipped_id.clone(), b"test-psk".to_vec())
            .build();
        let session = ready_session(AuthMethod::SharedKeyMic, store);
        let authenticator = Authenticator::new(&session);

        let auth = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
            .unwrap();

        for i in [0, 31, 63] {
            let mut message = MESSAGE;
            message[i] ^= 0x80;
            assert_eq!(
                authenticator.verify_auth_data(&auth, &message, &nonce(), &alice(), Role::Initiator),
                Err(AuthError::Failed)
            );
        }

        for i in 0..16 {
            let mut flipped = nonce();
            flipped[i] ^= 0x01;
            assert_eq!(
                authenticator.verify_auth_data(&auth, &MESSAGE, &flipped, &alice(), Role::Initiator),
                Err(AuthError::Failed)
            );
        }

        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &flipped_id, Role::Initiator),
            Err(AuthError::Failed)
        );

        let mut tampered = auth.clone();
        tampered.auth_data[31] ^= 0x01;
        assert_eq!(
            authenticator.verify_auth_data(&tampered, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Err(AuthError::Failed)
        );
    }

    #[test]
    fn test_psk_id_type_is_signed() {
        let as_fqdn = IdPayload::new(IdType::Fqdn, alice().data);
        let store = CredentialStore::builder()
            .with_shared_secret(alice(), b"test-psk".to_vec())
            .with_shared_secret(as_fqdn.clone(), b"test-psk".to_vec())
            .build();
        let session = ready_session(AuthMethod::SharedKeyMic, store);
        let authenticator = Authenticator::new(&session);

        let auth = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
            .unwrap();
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &as_fqdn, Role::Initiator),
            Err(AuthError::Failed)
        );
    }

    #[test]
    fn test_psk_missing_secret() {
        let session = ready_session(AuthMethod::SharedKeyMic, CredentialStore::default());
        let authenticator = Authenticator::new(&session);

        assert_eq!(
            authenticator
                .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
                .unwrap_err(),
            AuthError::NotFound
        );

        // Well-formed MAC, but nothing to check it against
        let auth = AuthPayload::new(AuthMethod::SharedKeyMic, vec![0x42; 32]);
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Err(AuthError::NotFound)
        );
    }

    #[test]
    fn test_malformed_mac() {
        let session = ready_session(AuthMethod::SharedKeyMic, psk_store());
        let authenticator = Authenticator::new(&session);

        for data in [vec![], vec![0u8; 1], vec![0u8; 31], vec![0u8; 33], vec![0xFF; 1024]] {
            let auth = AuthPayload::new(AuthMethod::SharedKeyMic, data);
            assert_eq!(
                authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
                Err(AuthError::Failed)
            );
        }
    }

    #[test]
    fn test_method_mismatch() {
        let session = ready_session(AuthMethod::SharedKeyMic, psk_store());
        let authenticator = Authenticator::new(&session);

        let mut auth = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
            .unwrap();
        auth.auth_method = AuthMethod::RsaSig;

        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Err(AuthError::Failed)
        );
    }

    #[test]
    fn test_unsupported_method() {
        let session = ready_session(AuthMethod::DssSig, psk_store());
        let authenticator = Authenticator::new(&session);

        let auth = AuthPayload::new(AuthMethod::DssSig, vec![0u8; 40]);
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Err(AuthError::NotSupported)
        );
        assert_eq!(
            authenticator
                .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
                .unwrap_err(),
            AuthError::NotSupported
        );
    }

    #[test]
    fn test_unsupported_with_empty_registry() {
        let session = ready_session(AuthMethod::SharedKeyMic, psk_store());
        let authenticator = Authenticator::with_registry(&session, Arc::new(MethodRegistry::new()));

        let auth = AuthPayload::new(AuthMethod::SharedKeyMic, vec![0u8; 32]);
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Err(AuthError::NotSupported)
        );
        assert_eq!(
            authenticator
                .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
                .unwrap_err(),
            AuthError::NotSupported
        );
    }

    #[test]
    fn test_session_not_ready() {
        let session = new_session(AuthMethod::SharedKeyMic, psk_store());
        let authenticator = Authenticator::new(&session);

        let auth = AuthPayload::new(AuthMethod::SharedKeyMic, vec![0u8; 32]);
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Err(AuthError::NotFound)
        );
        assert_eq!(
            authenticator
                .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
                .unwrap_err(),
            AuthError::NotFound
        );
    }

    #[test]
    fn test_session_deleted() {
        let mut session = ready_session(AuthMethod::SharedKeyMic, psk_store());
        let auth = Authenticator::new(&session)
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
            .unwrap();

        session.transition_to(IkeState::Deleting).unwrap();
        let authenticator = Authenticator::new(&session);
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Err(AuthError::NotFound)
        );
    }

    #[test]
    fn test_remote_id_pinning() {
        let mallory = IdPayload::from_email("mallory@example.com");
        let store = CredentialStore::builder()
            .with_shared_secret(alice(), b"test-psk".to_vec())
            .with_shared_secret(mallory.clone(), b"mallory-psk".to_vec())
            .build();
        let config = SaConfig::builder()
            .with_local_id(IdPayload::from_fqdn("gw.example.com"))
            .with_remote_id(alice())
            .build()
            .unwrap();
        let mut session = IkeSession::new_responder(config, Arc::new(store), [1; 8], [2; 8]);
        session
            .derive_keys(PrfAlgorithm::HmacSha256, &[1; 32], &[2; 32], &[3; 64], 32, 32)
            .unwrap();
        let authenticator = Authenticator::new(&session);

        let from_mallory = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &mallory, Role::Initiator)
            .unwrap();
        assert_eq!(
            authenticator.verify_auth_data(&from_mallory, &MESSAGE, &nonce(), &mallory, Role::Initiator),
            Err(AuthError::NotFound)
        );

        let from_alice = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
            .unwrap();
        assert_eq!(
            authenticator.verify_auth_data(&from_alice, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Ok(())
        );
    }

    #[test]
    fn test_rsa_scenario() {
        let auth = {
            let session = ready_session(AuthMethod::RsaSig, rsa_store(None));
            Authenticator::new(&session)
                .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
                .unwrap()
        };
        assert_eq!(auth.auth_method, AuthMethod::RsaSig);
        assert_eq!(auth.auth_data.len(), 256);

        // Matching public key
        let session = ready_session(AuthMethod::RsaSig, rsa_store(Some(ALICE_PUB_PEM)));
        let authenticator = Authenticator::new(&session);
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Ok(())
        );
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Responder),
            Err(AuthError::Failed)
        );

        // Unrelated public key
        let session = ready_session(AuthMethod::RsaSig, rsa_store(Some(MALLORY_PUB_PEM)));
        assert_eq!(
            Authenticator::new(&session).verify_auth_data(
                &auth,
                &MESSAGE,
                &nonce(),
                &alice(),
                Role::Initiator
            ),
            Err(AuthError::Failed)
        );

        // No key registered
        let session = ready_session(AuthMethod::RsaSig, rsa_store(None));
        assert_eq!(
            Authenticator::new(&session).verify_auth_data(
                &auth,
                &MESSAGE,
                &nonce(),
                &alice(),
                Role::Initiator
            ),
            Err(AuthError::NotFound)
        );
    }

    #[test]
    fn test_rsa_malformed_signatures() {
        let session = ready_session(AuthMethod::RsaSig, rsa_store(Some(ALICE_PUB_PEM)));
        let authenticator = Authenticator::new(&session);

        let valid = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
            .unwrap();

        let truncated = valid.auth_data[..128].to_vec();
        let mut extended = valid.auth_data.clone();
        extended.push(0);

        for data in [vec![], vec![0u8; 1], truncated, extended, vec![0xFF; 256]] {
            let auth = AuthPayload::new(AuthMethod::RsaSig, data);
            assert_eq!(
                authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
                Err(AuthError::Failed)
            );
        }
    }

    #[test]
    fn test_rsa_sensitive_to_every_input() {
        let mut flipped_id = alice();
        flipped_id.data[0] ^= 0x01;
        let store = CredentialStore::builder()
            .with_private_key_pem(alice(), ALICE_KEY_PEM)
            .unwrap()
            .with_public_key_pem(alice(), ALICE_PUB_PEM)
            .unwrap()
            .with_public_key_pem(flipped_id.clone(), ALICE_PUB_PEM)
            .unwrap()
            .build();
        let session = ready_session(AuthMethod::RsaSig, store);
        let authenticator = Authenticator::new(&session);

        let auth = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
            .unwrap();
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Ok(())
        );

        for i in [0, 31, 63] {
            let mut message = MESSAGE;
            message[i] ^= 0x80;
            assert_eq!(
                authenticator.verify_auth_data(&auth, &message, &nonce(), &alice(), Role::Initiator),
                Err(AuthError::Failed)
            );
        }

        for i in [0, 7, 15] {
            let mut flipped = nonce();
            flipped[i] ^= 0x01;
            assert_eq!(
                authenticator.verify_auth_data(&auth, &MESSAGE, &flipped, &alice(), Role::Initiator),
                Err(AuthError::Failed)
            );
        }

        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &nonce(), &flipped_id, Role::Initiator),
            Err(AuthError::Failed)
        );

        let mut tampered = auth.clone();
        tampered.auth_data[100] ^= 0x01;
        assert_eq!(
            authenticator.verify_auth_data(&tampered, &MESSAGE, &nonce(), &alice(), Role::Initiator),
            Err(AuthError::Failed)
        );
    }

    #[test]
    fn test_nonce_length_enforced() {
        let session = ready_session(AuthMethod::SharedKeyMic, psk_store());
        let authenticator = Authenticator::new(&session);
        let short = [0x01u8; 10];
        let long = [0x01u8; 257];

        for bad in [&short[..], &long[..]] {
            assert_eq!(
                authenticator
                    .compute_auth_data(&MESSAGE, bad, &alice(), Role::Initiator)
                    .unwrap_err(),
                AuthError::Failed
            );
        }

        let auth = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
            .unwrap();
        assert_eq!(
            authenticator.verify_auth_data(&auth, &MESSAGE, &short, &alice(), Role::Initiator),
            Err(AuthError::Failed)
        );
    }

    #[test]
    fn test_rsa_missing_private_key() {
        let store = CredentialStore::builder()
            .with_public_key_pem(alice(), ALICE_PUB_PEM)
            .unwrap()
            .build();
        let session = ready_session(AuthMethod::RsaSig, store);

        assert_eq!(
            Authenticator::new(&session)
                .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Initiator)
                .unwrap_err(),
            AuthError::NotFound
        );
    }

    #[test]
    fn test_dyn_session() {
        let session = ready_session(AuthMethod::SharedKeyMic, psk_store());
        let session: &dyn ProtectedSession = &session;
        let authenticator = Authenticator::new(session);

        let auth = authenticator
            .compute_auth_data(&MESSAGE, &nonce(), &alice(), Role::Responder)
            .unwrap();
        assert!(authenticator
            .verify_auth_data(&auth, &MESSAGE, &nonce(), &alice(), Role::Responder)
            .is_ok());
    }

    #[test]
    fn test_auth_error() {
        for err in [AuthError::Failed, AuthError::NotSupported, AuthError::NotFound] {
            assert_eq!(err.notify_type(), AUTHENTICATION_FAILED);
        }
        assert_eq!(AuthError::Failed.to_string(), "Authentication failed");
        assert_eq!(
            AuthError::NotSupported.to_string(),
            "Authentication method not supported"
        );
        assert_eq!(AuthError::NotFound.to_string(), "Credential not found");
    }
}
