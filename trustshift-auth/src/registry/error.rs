//! Registry error types.

/// Errors returned by [`IdentityRegistry`](super::IdentityRegistry) implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The username is already registered.
    #[error("username already exists")]
    AlreadyExists,

    /// The username is not registered.
    #[error("username not found")]
    NotFound,

    /// The identity has no outstanding challenge.
    #[error("no pending challenge")]
    NoPendingChallenge,
}
