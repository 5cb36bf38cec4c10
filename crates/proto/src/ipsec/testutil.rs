//! RSA fixtures shared by unit tests

pub(crate) const ALICE_KEY_PEM: &str = include_str!("../../tests/fixtures/alice_key.pem");
pub(crate) const ALICE_PUB_PEM: &str = include_str!("../../tests/fixtures/alice_pub.pem");
pub(crate) const ALICE_CERT_DER: &[u8] = include_bytes!("../../tests/fixtures/alice_cert.der");
pub(crate) const MALLORY_KEY_PEM: &str = include_str!("../../tests/fixtures/mallory_key.pem");
pub(crate) const MALLORY_PUB_PEM: &str = include_str!("../../tests/fixtures/mallory_pub.pem");
pub(crate) const ALICE_KEY_PKCS1_PEM: &str =
    include_str!("../../tests/fixtures/alice_key_pkcs1.pem");
pub(crate) const ALICE_PUB_PKCS1_PEM: &str =
    include_str!("../../tests/fixtures/alice_pub_pkcs1.pem");
pub(crate) const WEAK_KEY_PEM: &str = include_str!("../../tests/fixtures/weak_key.pem");
pub(crate) const WEAK_PUB_PEM: &str = include_str!("../../tests/fixtures/weak_pub.pem");
