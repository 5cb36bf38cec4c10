//! IKE_AUTH Pre-Shared Key Example
//!
//! This example demonstrates mutual IKEv2 peer authentication with a pre-shared
//! key using the ikeward-proto library. An initiator and a responder session
//! derive their keys from the same simulated IKE_SA_INIT exchange, then each
//! side computes its AUTH payload and verifies the other's.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example psk_authentication --features ipsec -- [initiator_id] [responder_id] [psk]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=debug cargo run --example psk_authentication --features ipsec -- client@example.com vpn.example.com "my-secret-key"
//! ```

use ikeward_proto::ipsec::{
    ikev2::IkeState, AuthPayload, Authenticator, CredentialSource, CredentialStore, IdPayload,
    IkeSession, PrfAlgorithm, Role, SaConfig,
};
use rand::RngCore;
use std::env;
use std::sync::Arc;

/// Bytes one IKE_SA_INIT exchange leaves behind for IKE_AUTH
struct InitExchange {
    init_request: Vec<u8>,
    init_response: Vec<u8>,
    nonce_i: Vec<u8>,
    nonce_r: Vec<u8>,
    dh_secret: Vec<u8>,
}

fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut buf);
    buf
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let arg = |i: usize, default: &'static str| args.get(i).map_or(default, |s| s.as_str());
    let initiator_id = IdPayload::from_email(arg(1, "client@example.com"));
    let responder_id = IdPayload::from_fqdn(arg(2, "vpn.example.com"));
    let psk = arg(3, "my-secret-key").as_bytes().to_vec();

    println!("IKE_AUTH PSK Example");
    println!("====================");
    println!("Initiator: {}", initiator_id);
    println!("Responder: {}", responder_id);
    println!();

    // Both peers hold the same key for both identities
    let credentials: Arc<dyn CredentialSource> = Arc::new(
        CredentialStore::builder()
            .with_shared_secret(initiator_id.clone(), psk.clone())
            .with_shared_secret(responder_id.clone(), psk)
            .build(),
    );

    let exchange = Arc::new(InitExchange {
        init_request: random_bytes(336),
        init_response: random_bytes(344),
        nonce_i: random_bytes(32),
        nonce_r: random_bytes(32),
        dh_secret: random_bytes(256),
    });
    let spi_i = [0x1A, 0x2B, 0x3C, 0x4D, 0x5E, 0x6F, 0x70, 0x81];
    let spi_r = [0x92, 0xA3, 0xB4, 0xC5, 0xD6, 0xE7, 0xF8, 0x09];

    let mut initiator = IkeSession::new_initiator(
        SaConfig::builder()
            .with_local_id(initiator_id.clone())
            .with_remote_id(responder_id.clone())
            .build()?,
        credentials.clone(),
        spi_i,
    );
    let mut responder = IkeSession::new_responder(
        SaConfig::builder()
            .with_local_id(responder_id.clone())
            .with_remote_id(initiator_id.clone())
            .build()?,
        credentials,
        spi_i,
        spi_r,
    );

    // IKE_SA_INIT
    println!("[1/3] IKE_SA_INIT: deriving keys...");
    initiator.transition_to(IkeState::InitSent)?;
    initiator.set_responder_spi(spi_r);
    for session in [&mut initiator, &mut responder] {
        session.derive_keys(
            PrfAlgorithm::HmacSha256,
            &exchange.nonce_i,
            &exchange.nonce_r,
            &exchange.dh_secret,
            32,
            32,
        )?;
    }

    // IKE_AUTH request
    println!("[2/3] IKE_AUTH request: initiator proves its identity...");
    let auth_i = Authenticator::new(&initiator).compute_auth_data(
        &exchange.init_request,
        &exchange.nonce_r,
        &initiator_id,
        Role::Initiator,
    )?;
    initiator.transition_to(IkeState::AuthSent)?;
    println!("  AUTH: {}", hex::encode(&auth_i.auth_data));

    // Responder work is CPU-bound; keep it off the async workers
    let (responder, auth_r) = {
        let exchange = exchange.clone();
        let initiator_id = initiator_id.clone();
        let responder_id = responder_id.clone();
        tokio::task::spawn_blocking(move || -> Result<(IkeSession, AuthPayload), String> {
            let authenticator = Authenticator::new(&responder);
            authenticator
                .verify_auth_data(
                    &auth_i,
                    &exchange.init_request,
                    &exchange.nonce_r,
                    &initiator_id,
                    Role::Initiator,
                )
                .map_err(|e| format!("responder rejected initiator: {}", e))?;

            let auth_r = authenticator
                .compute_auth_data(
                    &exchange.init_response,
                    &exchange.nonce_i,
                    &responder_id,
                    Role::Responder,
                )
                .map_err(|e| format!("responder AUTH failed: {}", e))?;

            responder
                .transition_to(IkeState::Established)
                .map_err(|e| e.to_string())?;
            Ok((responder, auth_r))
        })
        .await??
    };

    // IKE_AUTH response
    println!("[3/3] IKE_AUTH response: initiator checks the responder...");
    let result = Authenticator::new(&initiator).verify_auth_data(
        &auth_r,
        &exchange.init_response,
        &exchange.nonce_i,
        &responder_id,
        Role::Responder,
    );
    match result {
        Ok(()) => {
            initiator.transition_to(IkeState::Established)?;
            println!();
            println!("✓ IKE SA established");
            println!("  Initiator state: {}", initiator.state());
            println!("  Responder state: {}", responder.state());
        }
        Err(err) => {
            println!();
            println!("✗ Authentication failed: {} (notify {})", err, err.notify_type());
        }
    }

    Ok(())
}
