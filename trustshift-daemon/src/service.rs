//! Request handling on top of the authenticator.
//!
//! This is the only layer that logs. Verification failures are logged with
//! their reason and answered with a single generic message.

use std::sync::Arc;

use trustshift_auth::{Authenticator, IdentityRegistry, MemoryRegistry, RegisterError};

use crate::wire::{
    INVALID_CHALLENGE_RESPONSE, INVALID_PUBLIC_KEY, INVALID_USERNAME, MALFORMED_REQUEST,
    Request, Response, UNKNOWN_USER, USERNAME_TAKEN, decode_base64,
};

/// Longest accepted username, in characters.
pub const MAX_USERNAME_CHARS: usize = 64;

/// Why a username was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("username is empty")]
    Empty,
    #[error("username is longer than 64 characters")]
    TooLong,
    #[error("username contains a control character")]
    ControlCharacter,
}

/// Check a username before it reaches the registry.
pub fn validate_username(username: &str) -> Result<(), UsernameError> {
    if username.is_empty() {
        return Err(UsernameError::Empty);
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(UsernameError::TooLong);
    }
    if username.chars().any(char::is_control) {
        return Err(UsernameError::ControlCharacter);
    }
    Ok(())
}

/// Shared request handler. Cloning is cheap.
#[derive(Debug)]
pub struct AuthService<R = MemoryRegistry> {
    authenticator: Arc<Authenticator<R>>,
}

impl<R> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

impl<R: IdentityRegistry> AuthService<R> {
    pub fn new(authenticator: Authenticator<R>) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
        }
    }

    pub fn authenticator(&self) -> &Authenticator<R> {
        &self.authenticator
    }

    /// Decode one JSON frame and answer it.
    pub fn handle_frame(&self, frame: &[u8]) -> Response {
        match serde_json::from_slice::<Request>(frame) {
            Ok(request) => self.handle(request),
            Err(e) => {
                tracing::warn!(error = %e, "Malformed request");
                Response::error(MALFORMED_REQUEST)
            }
        }
    }

    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::Register {
                username,
                sign_key,
                enc_key,
            } => self.register(&username, &sign_key, &enc_key),
            Request::GetChallenge { username } => self.get_challenge(&username),
            Request::VerifyChallenge {
                username,
                challenge_response,
            } => self.verify_challenge(&username, &challenge_response),
        }
    }

    fn register(&self, username: &str, sign_key: &str, enc_key: &str) -> Response {
        if let Err(e) = validate_username(username) {
            tracing::warn!(username = ?username, reason = %e, "Registration rejected");
            return Response::error(INVALID_USERNAME);
        }

        match self.authenticator.register(username, sign_key, enc_key) {
            Ok(identity) => {
                tracing::info!(
                    username = %username,
                    fingerprint = %identity.signing_key().fingerprint(),
                    bits = identity.signing_key().modulus_bits(),
                    "Identity registered"
                );
                Response::success()
            }
            Err(RegisterError::AlreadyExists) => {
                tracing::warn!(username = %username, "Username already registered");
                Response::error(USERNAME_TAKEN)
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Registration rejected");
                Response::error(INVALID_PUBLIC_KEY)
            }
        }
    }

    fn get_challenge(&self, username: &str) -> Response {
        if let Err(e) = validate_username(username) {
            tracing::warn!(username = ?username, reason = %e, "Challenge refused");
            return Response::error(UNKNOWN_USER);
        }

        match self.authenticator.issue_challenge(username) {
            Ok(challenge) => {
                tracing::info!(username = %username, "Challenge issued");
                Response::challenge(&challenge)
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Challenge refused");
                Response::error(UNKNOWN_USER)
            }
        }
    }

    fn verify_challenge(&self, username: &str, challenge_response: &str) -> Response {
        if let Err(e) = validate_username(username) {
            tracing::warn!(username = ?username, reason = %e, "Verification failed");
            return Response::error(INVALID_CHALLENGE_RESPONSE);
        }

        let Some(signature) = decode_base64(challenge_response) else {
            tracing::warn!(
                username = %username,
                reason = "signature is not base64",
                "Verification failed"
            );
            return Response::error(INVALID_CHALLENGE_RESPONSE);
        };

        match self.authenticator.verify(username, &signature) {
            Ok(verified) => {
                tracing::info!(username = %verified.username(), "Signature verified");
                Response::success()
            }
            Err(e) => {
                tracing::warn!(username = %username, reason = %e, "Verification failed");
                Response::error(INVALID_CHALLENGE_RESPONSE)
            }
        }
    }
}
