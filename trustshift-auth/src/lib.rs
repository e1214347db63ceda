//! Pure authentication library for TrustShift.
//!
//! A client registers an RSA signing public key (plus an encryption public
//! key that is stored for later use) and proves possession of the private
//! key by signing a random challenge issued by the server.
//!
//! This crate is intentionally IO-free:
//! - No filesystem operations
//! - No network calls
//! - No logging
//!
//! Storage is injected via the [`registry::IdentityRegistry`] trait;
//! [`registry::MemoryRegistry`] is the in-process implementation.
//!
//! # Example
//!
//! ```ignore
//! use trustshift_auth::{Authenticator, MemoryRegistry};
//!
//! let auth = Authenticator::new(MemoryRegistry::new());
//! auth.register("alice", &signing_pem, &encryption_pem)?;
//!
//! // Send the challenge bytes to the client, which signs them
//! let challenge = auth.issue_challenge("alice")?;
//!
//! // Server verifies the returned signature
//! let verified = auth.verify("alice", &signature)?;
//! ```

pub mod authn;
pub mod challenge;
pub mod identity;
pub mod registry;

#[cfg(test)]
mod test_keys;

pub use authn::{Authenticator, AuthnError, ChallengeError, RegisterError, VerifiedIdentity};
pub use challenge::{CHALLENGE_LEN, Challenge};
pub use identity::{Fingerprint, KeyError, KeyRole, PublicKey, decode_public_key};
pub use registry::{Identity, IdentityRegistry, MemoryRegistry, RegistryError};
