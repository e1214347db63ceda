//! Public key handling for TrustShift identities.
//!
//! Clients generate their own RSA key pairs and submit only the public
//! halves, PEM encoded:
//!
//! - [`PublicKey`] - Decoded RSA public key with its fingerprint
//! - [`Fingerprint`] - `SHA256:{base64_no_padding}` over the SPKI DER
//! - [`decode_public_key`] - Entry point for raw request bytes
//!
//! # Security Properties
//!
//! - Only RSA keys between 2048 and 4096 bits are accepted
//! - Fingerprint comparison uses constant-time equality
//! - `Debug` output shows the fingerprint, never the modulus
//!
//! # Example
//!
//! ```ignore
//! use trustshift_auth::identity::decode_public_key;
//!
//! let key = decode_public_key(pem.as_bytes())?;
//! println!("Key fingerprint: {}", key.fingerprint());
//! ```

mod keys;

pub use keys::{
    Fingerprint, KeyError, KeyRole, MIN_MODULUS_BITS, PublicKey, SHA512_DIGEST_LEN,
    decode_public_key,
};
