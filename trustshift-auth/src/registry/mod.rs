//! Identity storage.
//!
//! The protocol only needs four operations on stored identities, captured
//! by [`IdentityRegistry`]. [`MemoryRegistry`] keeps identities in process
//! memory; a durable store implements the same trait.

mod error;
mod memory;

pub use error::RegistryError;
pub use memory::MemoryRegistry;

use crate::challenge::Challenge;
use crate::identity::PublicKey;

/// One registered principal.
///
/// Everything except the pending challenge is fixed at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
    signing_key: PublicKey,
    encryption_key: PublicKey,
    pending_challenge: Option<Challenge>,
}

impl Identity {
    /// Create a freshly registered identity with no outstanding challenge.
    #[must_use]
    pub fn new(username: impl Into<String>, signing_key: PublicKey, encryption_key: PublicKey) -> Self {
        Self {
            username: username.into(),
            signing_key,
            encryption_key,
            pending_challenge: None,
        }
    }

    /// Attach (or clear) the outstanding challenge.
    ///
    /// For registry implementations that keep challenges apart from the
    /// rest of the record.
    #[must_use]
    pub fn with_pending_challenge(mut self, challenge: Option<Challenge>) -> Self {
        self.pending_challenge = challenge;
        self
    }

    /// The unique username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Key that verifies challenge signatures.
    #[must_use]
    pub fn signing_key(&self) -> &PublicKey {
        &self.signing_key
    }

    /// Encryption key, stored but not used by the protocol.
    #[must_use]
    pub fn encryption_key(&self) -> &PublicKey {
        &self.encryption_key
    }

    /// The outstanding challenge, if any.
    #[must_use]
    pub fn pending_challenge(&self) -> Option<&Challenge> {
        self.pending_challenge.as_ref()
    }
}

/// Storage for registered identities.
///
/// # Thread Safety
///
/// Uses `&self` to allow concurrent access. Implementations should use
/// interior mutability (e.g., `Mutex`, `DashMap`) and serialize mutations
/// of the same username.
///
/// # Atomicity
///
/// `register` and `take_pending_challenge` **MUST be atomic** per username:
/// - Two concurrent `register` calls for one username: exactly one succeeds
/// - Two concurrent `take_pending_challenge` calls: at most one returns the
///   challenge, the other sees `NoPendingChallenge`
///
/// A check-then-act implementation lets two verifications consume the same
/// challenge, which defeats replay protection.
pub trait IdentityRegistry: Send + Sync {
    /// Insert a new identity.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::AlreadyExists` without modifying the stored
    /// identity if the username is taken.
    fn register(&self, identity: Identity) -> Result<(), RegistryError>;

    /// Fetch a snapshot of an identity.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for unknown usernames.
    fn get(&self, username: &str) -> Result<Identity, RegistryError>;

    /// Store a challenge, replacing any outstanding one.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for unknown usernames.
    fn set_pending_challenge(&self, username: &str, challenge: Challenge)
    -> Result<(), RegistryError>;

    /// Remove and return the outstanding challenge.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for unknown usernames and
    /// `RegistryError::NoPendingChallenge` if nothing is outstanding.
    fn take_pending_challenge(&self, username: &str) -> Result<Challenge, RegistryError>;
}
