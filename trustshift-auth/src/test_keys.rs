//! Shared RSA fixtures for unit tests.
//!
//! Key generation is slow in debug builds, so each key is created once per
//! test binary.

use std::sync::OnceLock;

use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPrivateKey};
use sha2::{Digest, Sha512};

fn generate(cell: &'static OnceLock<RsaPrivateKey>, bits: usize) -> &'static RsaPrivateKey {
    cell.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::thread_rng(), bits).expect("RSA key generation failed")
    })
}

pub(crate) fn alice_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    generate(&KEY, 2048)
}

pub(crate) fn mallory_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    generate(&KEY, 2048)
}

/// The size the browser extension generates.
pub(crate) fn extension_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    generate(&KEY, 4096)
}

pub(crate) fn spki_pem(key: &RsaPrivateKey) -> String {
    key.to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .expect("SPKI encoding failed")
}

/// Sign the way the browser extension does: PSS, SHA-512, maximum salt.
pub(crate) fn pss_sign(key: &RsaPrivateKey, message: &[u8]) -> Vec<u8> {
    let em_len = (key.n().bits() - 1).div_ceil(8);
    let salt_len = em_len - 64 - 2;
    let hashed = Sha512::digest(message);
    key.sign_with_rng(
        &mut rand::thread_rng(),
        Pss::new_with_salt::<Sha512>(salt_len),
        &hashed,
    )
    .expect("PSS signing failed")
}
