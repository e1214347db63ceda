//! In-memory identity registry.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::error::RegistryError;
use super::{Identity, IdentityRegistry};
use crate::challenge::Challenge;

/// Identity registry backed by a concurrent hash map.
///
/// # Concurrency
///
/// - Operations on different usernames proceed in parallel (sharded locks)
/// - Mutations of one username are serialized by the shard lock, which is
///   held across each check-and-write
///
/// Identities live for the life of the process; there is no removal.
///
/// # Usage
///
/// ```
/// use trustshift_auth::{Authenticator, MemoryRegistry};
///
/// let auth = Authenticator::new(MemoryRegistry::new());
/// assert!(auth.registry().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    identities: DashMap<String, Identity>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Check if no identity is registered.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Check if a username is registered.
    pub fn contains(&self, username: &str) -> bool {
        self.identities.contains_key(username)
    }
}

impl IdentityRegistry for MemoryRegistry {
    fn register(&self, identity: Identity) -> Result<(), RegistryError> {
        // Entry API holds the shard lock across the existence check and insert
        match self.identities.entry(identity.username().to_owned()) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyExists),
            Entry::Vacant(entry) => {
                entry.insert(identity);
                Ok(())
            }
        }
    }

    fn get(&self, username: &str) -> Result<Identity, RegistryError> {
        self.identities
            .get(username)
            .map(|entry| entry.value().clone())
            .ok_or(RegistryError::NotFound)
    }

    fn set_pending_challenge(
        &self,
        username: &str,
        challenge: Challenge,
    ) -> Result<(), RegistryError> {
        let mut entry = self
            .identities
            .get_mut(username)
            .ok_or(RegistryError::NotFound)?;
        entry.pending_challenge = Some(challenge);
        Ok(())
    }

    fn take_pending_challenge(&self, username: &str) -> Result<Challenge, RegistryError> {
        let mut entry = self
            .identities
            .get_mut(username)
            .ok_or(RegistryError::NotFound)?;
        entry
            .pending_challenge
            .take()
            .ok_or(RegistryError::NoPendingChallenge)
    }
}
