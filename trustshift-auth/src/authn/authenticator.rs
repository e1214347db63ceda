//! Registration, issuance and verification over one registry.

use crate::challenge::Challenge;
use crate::identity::{KeyRole, decode_public_key};
use crate::registry::{Identity, IdentityRegistry, MemoryRegistry};

use super::error::{AuthnError, ChallengeError, RegisterError};
use super::verify::{VerifiedIdentity, issue_challenge, verify_challenge_response};

/// The protocol entry points, bound to an identity registry.
///
/// Share it behind an `Arc`; every method takes `&self`.
#[derive(Debug, Default)]
pub struct Authenticator<R = MemoryRegistry> {
    registry: R,
}

impl<R: IdentityRegistry> Authenticator<R> {
    /// Create an authenticator over the given registry.
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Register a new identity from PEM encoded public keys.
    ///
    /// Both keys are decoded before anything is stored, so a bad key leaves
    /// the registry untouched. Returns a snapshot of the new identity.
    ///
    /// # Errors
    ///
    /// - `RegisterError::InvalidKey` naming the key that failed to decode
    /// - `RegisterError::AlreadyExists` if the username is taken; the
    ///   existing identity is not modified
    pub fn register(
        &self,
        username: &str,
        signing_key_pem: impl AsRef<[u8]>,
        encryption_key_pem: impl AsRef<[u8]>,
    ) -> Result<Identity, RegisterError> {
        let signing_key =
            decode_public_key(signing_key_pem.as_ref()).map_err(|source| RegisterError::InvalidKey {
                role: KeyRole::Signing,
                source,
            })?;
        let encryption_key = decode_public_key(encryption_key_pem.as_ref()).map_err(|source| {
            RegisterError::InvalidKey {
                role: KeyRole::Encryption,
                source,
            }
        })?;

        let identity = Identity::new(username, signing_key, encryption_key);
        // AlreadyExists is the only reason a registry refuses an insert
        self.registry
            .register(identity.clone())
            .map_err(|_| RegisterError::AlreadyExists)?;

        Ok(identity)
    }

    /// Issue a fresh challenge, replacing any outstanding one.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError::NotFound` if the username is not registered.
    pub fn issue_challenge(&self, username: &str) -> Result<Challenge, ChallengeError> {
        issue_challenge(&self.registry, username)
    }

    /// Verify a signature over the outstanding challenge, consuming it.
    ///
    /// # Errors
    ///
    /// See [`verify_challenge_response`].
    #[must_use = "verification result must be checked"]
    pub fn verify(&self, username: &str, signature: &[u8]) -> Result<VerifiedIdentity, AuthnError> {
        verify_challenge_response(&self.registry, username, signature)
    }
}
