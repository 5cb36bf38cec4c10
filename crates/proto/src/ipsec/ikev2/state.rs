//! IKE SA lifecycle
//!
//! Tracks where an IKE SA is in the exchange sequence of RFC 7296, which
//! decides whether its derived keys may be used for authentication.
//!
//! # State Transitions
//!
//! ```text
//! IDLE
//!   ↓ (send IKE_SA_INIT request)
//! INIT_SENT
//!   ↓ (recv IKE_SA_INIT response, keys derived)
//! INIT_DONE
//!   ↓ (send IKE_AUTH request)
//! AUTH_SENT
//!   ↓ (recv IKE_AUTH response)
//! ESTABLISHED
//!   ↓ (CREATE_CHILD_SA, INFORMATIONAL)
//! REKEYING / DELETING
//! ```

use std::fmt;

/// IKE SA state
///
/// Represents the current state of an IKE Security Association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IkeState {
    /// Initial state - no exchange started
    Idle,

    /// IKE_SA_INIT request sent, waiting for response
    InitSent,

    /// IKE_SA_INIT completed, keys derived, ready for IKE_AUTH
    InitDone,

    /// IKE_AUTH request sent, waiting for response
    AuthSent,

    /// IKE SA established
    Established,

    /// Rekeying in progress
    Rekeying,

    /// Deletion in progress
    Deleting,

    /// IKE SA deleted
    Deleted,
}

impl IkeState {
    /// Check if state is a valid next state
    pub fn can_transition_to(&self, next: IkeState) -> bool {
        use IkeState::*;

        match (self, next) {
            // Forward transitions (Initiator)
            (Idle, InitSent) => true,
            (InitSent, InitDone) => true,
            (InitDone, AuthSent) => true,
            (AuthSent, Established) => true,

            // Forward transitions (Responder)
            (Idle, InitDone) => true,
            (InitDone, Established) => true,

            // Rekeying
            (Established, Rekeying) => true,
            (Rekeying, Established) => true,

            // Deletion from any live state
            (Deleted, Deleting) => false,
            (_, Deleting) => true,
            (Deleting, Deleted) => true,

            // Retransmission
            (s1, s2) if *s1 == s2 => true,

            _ => false,
        }
    }

    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, IkeState::Deleted)
    }

    /// Check if IKE SA is established
    pub fn is_established(&self) -> bool {
        matches!(self, IkeState::Established | IkeState::Rekeying)
    }

    /// Whether SK_p keys may be used in this state
    ///
    /// False before IKE_SA_INIT completes and once deletion has started.
    pub fn allows_authentication(&self) -> bool {
        matches!(
            self,
            IkeState::InitDone | IkeState::AuthSent | IkeState::Established | IkeState::Rekeying
        )
    }

    /// Whether derived keys must be discarded on entering this state
    pub fn discards_keys(&self) -> bool {
        matches!(self, IkeState::Deleting | IkeState::Deleted)
    }

    /// State name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            IkeState::Idle => "Idle",
            IkeState::InitSent => "InitSent",
            IkeState::InitDone => "InitDone",
            IkeState::AuthSent => "AuthSent",
            IkeState::Established => "Established",
            IkeState::Rekeying => "Rekeying",
            IkeState::Deleting => "Deleting",
            IkeState::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for IkeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
