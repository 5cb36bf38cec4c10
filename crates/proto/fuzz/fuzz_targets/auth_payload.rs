//! Fuzz target for AUTH payload verification.
//!
//! Feeds attacker-controlled AUTH and ID payload bodies through the decoder
//! and the authenticator to find:
//! - Panics
//! - Accepted forgeries
//! - Incorrect error handling
//!
//! Run with:
//! ```bash
//! cd crates/proto
//! cargo +nightly fuzz run auth_payload -- -max_total_time=300
//! ```

#![no_main]
use ikeward_proto::ipsec::{
    AuthPayload, Authenticator, AuthMethod, CredentialStore, IdPayload, IkeSession,
    PrfAlgorithm, Role, SaConfig,
};
use libfuzzer_sys::fuzz_target;
use std::sync::{Arc, OnceLock};

const ALICE_KEY_PEM: &str = include_str!("../../tests/fixtures/alice_key.pem");

fn sessions() -> &'static [IkeSession; 2] {
    static SESSIONS: OnceLock<[IkeSession; 2]> = OnceLock::new();
    SESSIONS.get_or_init(|| {
        let alice = IdPayload::from_email("alice@example.com");
        let store = Arc::new(
            CredentialStore::builder()
                .with_shared_secret(alice.clone(), b"fuzz-psk".to_vec())
                .with_private_key_pem(alice.clone(), ALICE_KEY_PEM)
                .expect("valid key")
                .build(),
        );

        [AuthMethod::SharedKeyMic, AuthMethod::RsaSig].map(|method| {
            let config = SaConfig::builder()
                .with_local_id(alice.clone())
                .with_auth_method(method)
                .build()
                .expect("valid config");
            let mut session = IkeSession::new_responder(config, store.clone(), [1; 8], [2; 8]);
            session
                .derive_keys(PrfAlgorithm::HmacSha256, &[1; 32], &[2; 32], &[3; 64], 32, 32)
                .expect("key derivation");
            session
        })
    })
}

fuzz_target!(|data: &[u8]| {
    // Split input into ID body and AUTH body
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let (id_body, auth_body) = rest.split_at((split as usize).min(rest.len()));

    let Ok(auth) = AuthPayload::from_payload_data(auth_body) else {
        return;
    };
    let peer = IdPayload::from_payload_data(id_body)
        .unwrap_or_else(|_| IdPayload::from_email("alice@example.com"));

    for session in sessions() {
        let result = Authenticator::new(session).verify_auth_data(
            &auth,
            &[0u8; 64],
            &[0x11; 32],
            &peer,
            Role::Initiator,
        );

        // Random bytes must never authenticate
        assert!(result.is_err(), "forged AUTH payload accepted");
    }
});
