//! Authentication error types.

use crate::identity::{KeyError, KeyRole};

/// Errors that can occur during registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RegisterError {
    /// One of the submitted public keys could not be decoded.
    #[error("invalid {role} key: {source}")]
    InvalidKey { role: KeyRole, source: KeyError },

    /// The username is already registered.
    #[error("username already exists")]
    AlreadyExists,
}

/// Errors that can occur while issuing a challenge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ChallengeError {
    /// The username is not registered.
    #[error("username not found")]
    NotFound,
}

/// Errors that can occur during signature verification.
///
/// Callers facing the network must not reveal which variant occurred.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AuthnError {
    /// The username is not registered.
    #[error("username not found")]
    NotFound,

    /// No challenge is outstanding (never issued or already consumed).
    #[error("no pending challenge")]
    NoPendingChallenge,

    /// The signature is invalid or malformed.
    #[error("invalid signature")]
    InvalidSignature,
}
