//! Structured logging for IKEv2 authentication
//!
//! Provides structured, contextual logging using the `tracing` framework.
//! All log messages include relevant context fields for debugging and monitoring.
//! Secret material (shared secrets, SK_p keys, signed octets) is never logged.
//!
//! # Log Levels
//!
//! - **TRACE**: Signed octets sizes
//! - **DEBUG**: Computed AUTH payloads
//! - **INFO**: Successful peer authentication, session state transitions
//! - **WARN**: Unsupported methods, missing credentials
//! - **ERROR**: Failed authentication, misuse of an unready session
//!
//! # Example
//!
//! ```no_run
//! use ikeward_proto::ipsec::logging;
//!
//! // Initialize tracing subscriber (in tests or applications)
//! tracing_subscriber::fmt()
//!     .with_env_filter("ikeward_proto::ipsec=debug")
//!     .init();
//!
//! logging::log_authentication_success("alice@example.com", "PSK");
//! ```

use tracing::{debug, error, info, trace, warn};

/// Log IKE SA state transition
///
/// # Arguments
///
/// * `spi_i` - Initiator SPI
/// * `spi_r` - Responder SPI
/// * `old_state` - Previous IKE SA state
/// * `new_state` - New IKE SA state
pub fn log_ike_state_transition(spi_i: &[u8], spi_r: &[u8], old_state: &str, new_state: &str) {
    info!(
        ike_spi_i = %hex::encode(spi_i),
        ike_spi_r = %hex::encode(spi_r),
        state_from = old_state,
        state_to = new_state,
        "IKE SA state transition"
    );
}

/// Log authentication success
///
/// # Arguments
///
/// * `peer_id` - Peer identity
/// * `auth_method` - Authentication method used (e.g., "PSK", "RSA")
pub fn log_authentication_success(peer_id: &str, auth_method: &str) {
    info!(
        peer_id = peer_id,
        auth_method = auth_method,
        "Peer authenticated successfully"
    );
}

/// Log authentication failure
///
/// # Arguments
///
/// * `peer_id` - Peer identity
/// * `reason` - Failure reason
pub fn log_authentication_failed(peer_id: &str, reason: &str) {
    error!(
        peer_id = peer_id,
        reason = reason,
        "Peer authentication failed"
    );
}

/// Log creation of our own AUTH payload
///
/// # Arguments
///
/// * `local_id` - Our identity
/// * `auth_method` - Authentication method used
/// * `auth_len` - Length of the MAC or signature in bytes
pub fn log_auth_data_computed(local_id: &str, auth_method: &str, auth_len: usize) {
    debug!(
        local_id = local_id,
        auth_method = auth_method,
        auth_len = auth_len,
        "AUTH payload computed"
    );
}

/// Log failure to produce our own AUTH payload
///
/// # Arguments
///
/// * `local_id` - Our identity
/// * `reason` - Failure reason
pub fn log_auth_data_failed(local_id: &str, reason: &str) {
    error!(
        local_id = local_id,
        reason = reason,
        "AUTH payload computation failed"
    );
}

/// Log a negotiated method with no registered handler
pub fn log_auth_method_unsupported(auth_method: &str) {
    warn!(
        auth_method = auth_method,
        "Authentication method not supported"
    );
}

/// Log a missing credential
///
/// # Arguments
///
/// * `identity` - Identity the lookup was keyed on
/// * `credential` - Kind of credential (e.g., "shared secret", "private key")
pub fn log_credential_not_found(identity: &str, credential: &str) {
    warn!(
        identity = identity,
        credential = credential,
        "No credential found for identity"
    );
}

/// Log use of a session before key derivation
pub fn log_session_not_ready(operation: &str, error: &str) {
    error!(
        operation = operation,
        error = error,
        "Authentication requested on a session without derived keys"
    );
}

/// Log signed octets assembly
///
/// # Arguments
///
/// * `party` - Party whose identity is bound ("initiator" or "responder")
/// * `message_len` - Length of the IKE message part
/// * `nonce_len` - Length of the nonce part
/// * `total_len` - Total signed octets length
pub fn log_signed_octets(party: &str, message_len: usize, nonce_len: usize, total_len: usize) {
    trace!(
        party = party,
        message_len = message_len,
        nonce_len = nonce_len,
        total_len = total_len,
        "Signed octets assembled"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_functions() {
        // These tests just verify the functions compile and execute
        // Actual log output would require tracing subscriber setup

        log_ike_state_transition(
            &[0x01, 0x02, 0x03, 0x04],
            &[0x05, 0x06, 0x07, 0x08],
            "Idle",
            "InitDone",
        );

        log_authentication_success("client@example.com", "PSK");
        log_authentication_failed("client@example.com", "invalid PSK");

        log_auth_data_computed("gw.example.com", "RSA", 256);
        log_auth_data_failed("gw.example.com", "Credential not found");
        log_auth_method_unsupported("DSS");
        log_credential_not_found("client@example.com", "shared secret");
        log_session_not_ready("verify", "SK_pi not derived");
        log_signed_octets("initiator", 64, 16, 112);
    }
}
