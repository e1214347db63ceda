//! Challenge issuance and signature verification.
//!
//! Both functions operate on any [`IdentityRegistry`]; the
//! [`Authenticator`](super::Authenticator) facade wraps them together with
//! registration.

use crate::challenge::Challenge;
use crate::registry::{IdentityRegistry, RegistryError};

use super::error::{AuthnError, ChallengeError};

/// Result of successful signature verification.
///
/// This is the only value that should lead to a session being established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity(String);

impl VerifiedIdentity {
    /// Create a new verified identity.
    ///
    /// # Visibility
    ///
    /// Crate-private so that a `VerifiedIdentity` can only come out of
    /// [`verify_challenge_response`], which performs the cryptographic check.
    #[must_use]
    pub(crate) fn new(username: String) -> Self {
        Self(username)
    }

    /// Get the verified username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.0
    }

    /// Consume and return the username.
    #[must_use]
    pub fn into_username(self) -> String {
        self.0
    }
}

/// Issue a fresh challenge for a registered user.
///
/// Any challenge still outstanding for the user is replaced and can no
/// longer be used. The returned bytes are raw; wire encoding is up to the
/// caller.
///
/// # Errors
///
/// Returns `ChallengeError::NotFound` if the username is not registered.
pub fn issue_challenge(
    registry: &impl IdentityRegistry,
    username: &str,
) -> Result<Challenge, ChallengeError> {
    let challenge = Challenge::generate();
    registry
        .set_pending_challenge(username, challenge.clone())
        .map_err(|_| ChallengeError::NotFound)?;
    Ok(challenge)
}

/// Verify a signature over the user's outstanding challenge.
///
/// The challenge is consumed before the signature is checked, so it is
/// single-use whatever the outcome. The signature must be RSA-PSS with
/// SHA-512 (digest and MGF1) and maximum salt length.
///
/// # Errors
///
/// - `AuthnError::NotFound` if the username is not registered
/// - `AuthnError::NoPendingChallenge` if no challenge is outstanding,
///   including one consumed by an earlier attempt
/// - `AuthnError::InvalidSignature` for any signature that does not verify,
///   malformed or wrong-length signatures included
#[must_use = "verification result must be checked"]
pub fn verify_challenge_response(
    registry: &impl IdentityRegistry,
    username: &str,
    signature: &[u8],
) -> Result<VerifiedIdentity, AuthnError> {
    let identity = registry.get(username).map_err(|_| AuthnError::NotFound)?;

    // Take-and-clear is atomic in the registry; concurrent attempts cannot
    // both see the challenge.
    let challenge = registry
        .take_pending_challenge(username)
        .map_err(|e| match e {
            RegistryError::NoPendingChallenge => AuthnError::NoPendingChallenge,
            _ => AuthnError::NotFound,
        })?;

    if !identity
        .signing_key()
        .verify_pss_sha512(challenge.as_bytes(), signature)
    {
        return Err(AuthnError::InvalidSignature);
    }

    Ok(VerifiedIdentity::new(identity.username().to_owned()))
}
