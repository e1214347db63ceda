//! Client-side helpers for protocol tests.
//!
//! Plays the part of the browser extension: owns RSA key pairs, exports
//! public keys as PEM and signs challenges with PSS/SHA-512, maximum salt.

use std::sync::OnceLock;

use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPrivateKey};
use sha2::{Digest, Sha512};

/// A client holding a signing and an encryption key pair.
pub struct TestClient {
    pub signing: RsaPrivateKey,
    pub encryption: RsaPrivateKey,
}

impl TestClient {
    /// Clients share keys across tests; generation is slow in debug builds.
    pub fn alice() -> &'static TestClient {
        static CLIENT: OnceLock<TestClient> = OnceLock::new();
        CLIENT.get_or_init(TestClient::generate)
    }

    pub fn mallory() -> &'static TestClient {
        static CLIENT: OnceLock<TestClient> = OnceLock::new();
        CLIENT.get_or_init(TestClient::generate)
    }

    fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing: RsaPrivateKey::new(&mut rng, 2048).expect("RSA key generation failed"),
            encryption: RsaPrivateKey::new(&mut rng, 2048).expect("RSA key generation failed"),
        }
    }

    pub fn signing_pem(&self) -> String {
        pem(&self.signing)
    }

    pub fn encryption_pem(&self) -> String {
        pem(&self.encryption)
    }

    pub fn sign(&self, challenge: &[u8]) -> Vec<u8> {
        let em_len = (self.signing.n().bits() - 1).div_ceil(8);
        let salt_len = em_len - 64 - 2;
        let hashed = Sha512::digest(challenge);
        self.signing
            .sign_with_rng(
                &mut rand::thread_rng(),
                Pss::new_with_salt::<Sha512>(salt_len),
                &hashed,
            )
            .expect("PSS signing failed")
    }
}

fn pem(key: &RsaPrivateKey) -> String {
    key.to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .expect("SPKI encoding failed")
}
