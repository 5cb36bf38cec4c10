//! Protected session context
//!
//! The authenticator borrows everything it needs (negotiated method, PRF,
//! SK_p keys, credentials, logging span) from a [`ProtectedSession`]. Every
//! accessor that depends on key derivation returns [`Error::NotReady`] until
//! IKE_SA_INIT has completed, so calling the authenticator too early fails
//! closed instead of running on absent key material.
//!
//! [`IkeSession`] is the concrete context of one IKE SA.

use crate::ipsec::config::SaConfig;
use crate::ipsec::credentials::CredentialSource;
use crate::ipsec::crypto::{KeyMaterial, PrfAlgorithm};
use crate::ipsec::ikev2::{AuthMethod, IkeState};
use crate::ipsec::{logging, Error, Result};
use std::fmt;
use std::sync::Arc;
use tracing::Span;

/// Role of a party in the IKE SA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Party that sent the first IKE_SA_INIT request
    Initiator,
    /// Party that answered it
    Responder,
}

impl Role {
    /// The opposite role
    pub fn other(self) -> Role {
        match self {
            Role::Initiator => Role::Responder,
            Role::Responder => Role::Initiator,
        }
    }

    /// Lowercase role name
    pub fn name(self) -> &'static str {
        match self {
            Role::Initiator => "initiator",
            Role::Responder => "responder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A PRF bound to one party's SK_p key
///
/// Borrowed from the session for a single computation.
#[derive(Clone, Copy)]
pub struct KeyedPrf<'a> {
    algorithm: PrfAlgorithm,
    key: &'a [u8],
}

impl<'a> KeyedPrf<'a> {
    /// Bind `algorithm` to `key`
    pub fn new(algorithm: PrfAlgorithm, key: &'a [u8]) -> Self {
        Self { algorithm, key }
    }

    /// Underlying PRF algorithm
    pub fn algorithm(&self) -> PrfAlgorithm {
        self.algorithm
    }

    /// Compute `prf(key, data)`
    pub fn compute(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.algorithm.compute(self.key, data)
    }
}

impl fmt::Debug for KeyedPrf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedPrf")
            .field("algorithm", &self.algorithm)
            .field("key_len", &self.key.len())
            .finish()
    }
}

/// Capabilities the authenticator needs from an IKE SA
pub trait ProtectedSession: Send + Sync {
    /// Authentication method negotiated for this SA
    fn auth_method(&self) -> Result<AuthMethod>;

    /// PRF negotiated in IKE_SA_INIT
    fn prf(&self) -> Result<PrfAlgorithm>;

    /// PRF keyed with SK_pi (initiator) or SK_pr (responder)
    fn signing_prf(&self, party: Role) -> Result<KeyedPrf<'_>>;

    /// Authentication policy of this SA
    fn config(&self) -> &SaConfig;

    /// Where secrets and keys are looked up
    fn credentials(&self) -> &dyn CredentialSource;

    /// Logging span of this SA
    fn span(&self) -> &Span;
}

/// Context of one IKE SA
pub struct IkeSession {
    role: Role,
    state: IkeState,
    config: SaConfig,
    initiator_spi: [u8; 8],
    responder_spi: [u8; 8],
    prf: Option<PrfAlgorithm>,
    keys: Option<KeyMaterial>,
    credentials: Arc<dyn CredentialSource>,
    span: Span,
}

impl IkeSession {
    /// Create new session as initiator
    ///
    /// The responder SPI is learned later with [`set_responder_spi`](Self::set_responder_spi).
    pub fn new_initiator(
        config: SaConfig,
        credentials: Arc<dyn CredentialSource>,
        initiator_spi: [u8; 8],
    ) -> Self {
        Self::new(Role::Initiator, config, credentials, initiator_spi, [0u8; 8])
    }

    /// Create new session as responder
    pub fn new_responder(
        config: SaConfig,
        credentials: Arc<dyn CredentialSource>,
        initiator_spi: [u8; 8],
        responder_spi: [u8; 8],
    ) -> Self {
        Self::new(
            Role::Responder,
            config,
            credentials,
            initiator_spi,
            responder_spi,
        )
    }

    fn new(
        role: Role,
        config: SaConfig,
        credentials: Arc<dyn CredentialSource>,
        initiator_spi: [u8; 8],
        responder_spi: [u8; 8],
    ) -> Self {
        let span = tracing::info_span!(
            "ike_sa",
            role = role.name(),
            ike_spi_i = %hex::encode(initiator_spi),
            local_id = %config.local_id,
        );

        IkeSession {
            role,
            state: IkeState::Idle,
            config,
            initiator_spi,
            responder_spi,
            prf: None,
            keys: None,
            credentials,
            span,
        }
    }

    /// Our role in this SA
    pub fn role(&self) -> Role {
        self.role
    }

    /// Current state
    pub fn state(&self) -> IkeState {
        self.state
    }

    /// Initiator SPI
    pub fn initiator_spi(&self) -> &[u8; 8] {
        &self.initiator_spi
    }

    /// Responder SPI
    pub fn responder_spi(&self) -> &[u8; 8] {
        &self.responder_spi
    }

    /// Record the responder SPI from the IKE_SA_INIT response
    pub fn set_responder_spi(&mut self, responder_spi: [u8; 8]) {
        self.responder_spi = responder_spi;
    }

    /// Whether SK_p keys are available for authentication
    pub fn is_ready(&self) -> bool {
        self.keys.is_some() && self.prf.is_some() && self.state.allows_authentication()
    }

    /// Transition to new state
    ///
    /// Entering `Deleting` or `Deleted` discards the derived keys.
    pub fn transition_to(&mut self, new_state: IkeState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        let old_state = self.state;
        self.state = new_state;
        if new_state.discards_keys() {
            // KeyMaterial zeroizes on drop
            self.keys = None;
            self.prf = None;
        }

        self.span.in_scope(|| {
            logging::log_ike_state_transition(
                &self.initiator_spi,
                &self.responder_spi,
                old_state.name(),
                new_state.name(),
            )
        });
        Ok(())
    }

    /// Derive SK_* keys after IKE_SA_INIT (RFC 7296 Section 2.14)
    ///
    /// Moves the session to `InitDone`.
    ///
    /// # Arguments
    ///
    /// * `prf` - Negotiated PRF
    /// * `nonce_i` - Initiator's nonce
    /// * `nonce_r` - Responder's nonce
    /// * `shared_secret` - DH shared secret (g^ir)
    /// * `encr_key_len` - Encryption key length in bytes
    /// * `integ_key_len` - Integrity key length in bytes
    pub fn derive_keys(
        &mut self,
        prf: PrfAlgorithm,
        nonce_i: &[u8],
        nonce_r: &[u8],
        shared_secret: &[u8],
        encr_key_len: usize,
        integ_key_len: usize,
    ) -> Result<()> {
        self.check_can_install_keys()?;

        let keys = KeyMaterial::derive(
            prf,
            nonce_i,
            nonce_r,
            shared_secret,
            &self.initiator_spi,
            &self.responder_spi,
            encr_key_len,
            integ_key_len,
        )?;

        self.install_keys(prf, keys)
    }

    /// Install externally derived key material
    ///
    /// Moves the session to `InitDone`.
    pub fn install_keys(&mut self, prf: PrfAlgorithm, keys: KeyMaterial) -> Result<()> {
        self.check_can_install_keys()?;

        if keys.sk_pi.is_empty() || keys.sk_pr.is_empty() {
            return Err(Error::InvalidParameter("SK_p keys cannot be empty".into()));
        }

        self.transition_to(IkeState::InitDone)?;
        self.prf = Some(prf);
        self.keys = Some(keys);
        Ok(())
    }

    fn check_can_install_keys(&self) -> Result<()> {
        match self.state {
            IkeState::Idle | IkeState::InitSent => Ok(()),
            state => Err(Error::InvalidState(format!(
                "Cannot install keys in state {}",
                state
            ))),
        }
    }

    fn ready_keys(&self) -> Result<(PrfAlgorithm, &KeyMaterial)> {
        if !self.state.allows_authentication() {
            return Err(Error::NotReady(format!("IKE SA in state {}", self.state)));
        }

        match (self.prf, self.keys.as_ref()) {
            (Some(prf), Some(keys)) => Ok((prf, keys)),
            _ => Err(Error::NotReady("SK_p keys not derived".into())),
        }
    }
}

impl ProtectedSession for IkeSession {
    fn auth_method(&self) -> Result<AuthMethod> {
        self.ready_keys()?;
        Ok(self.config.auth_method)
    }

    fn prf(&self) -> Result<PrfAlgorithm> {
        let (prf, _) = self.ready_keys()?;
        Ok(prf)
    }

    fn signing_prf(&self, party: Role) -> Result<KeyedPrf<'_>> {
        let (prf, keys) = self.ready_keys()?;
        let key = match party {
            Role::Initiator => &keys.sk_pi,
            Role::Responder => &keys.sk_pr,
        };
        Ok(KeyedPrf::new(prf, key))
    }

    fn config(&self) -> &SaConfig {
        &self.config
    }

    fn credentials(&self) -> &dyn CredentialSource {
        self.credentials.as_ref()
    }

    fn span(&self) -> &Span {
        &self.span
    }
}

impl fmt::Debug for IkeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IkeSession")
            .field("role", &self.role)
            .field("state", &self.state)
            .field("local_id", &self.config.local_id)
            .field("initiator_spi", &hex::encode(self.initiator_spi))
            .field("responder_spi", &hex::encode(self.responder_spi))
            .field("prf", &self.prf)
            .field("keys_derived", &self.keys.is_some())
            .finish()
    }
}
