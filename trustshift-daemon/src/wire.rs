//! JSON messages exchanged with clients.
//!
//! Field names match the browser extension (`sign_key`, `enc_key`,
//! `challengeResponse`). Binary values travel as standard base64 with
//! padding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use trustshift_auth::Challenge;

/// Returned for every failed verification, whatever the cause.
pub const INVALID_CHALLENGE_RESPONSE: &str = "Invalid challenge response";
/// Registration with a taken username.
pub const USERNAME_TAKEN: &str = "Username already registered";
/// Registration with an undecodable key.
pub const INVALID_PUBLIC_KEY: &str = "Invalid public key";
/// Username failed boundary validation.
pub const INVALID_USERNAME: &str = "Invalid username";
/// Challenge requested for an unregistered username.
pub const UNKNOWN_USER: &str = "Unknown user";
/// Frame was not a recognised request.
pub const MALFORMED_REQUEST: &str = "Malformed request";

/// A client request, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Register a username with PEM encoded public keys.
    Register {
        username: String,
        sign_key: String,
        enc_key: String,
    },
    /// Ask for a fresh challenge.
    GetChallenge { username: String },
    /// Submit a base64 signature over the last challenge.
    VerifyChallenge {
        username: String,
        #[serde(rename = "challengeResponse")]
        challenge_response: String,
    },
}

impl Request {
    /// The username the request is about.
    pub fn username(&self) -> &str {
        match self {
            Self::Register { username, .. }
            | Self::GetChallenge { username }
            | Self::VerifyChallenge { username, .. } => username,
        }
    }
}

/// A server response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// `{"success": true}`
    Success { success: bool },
    /// `{"challenge": "<base64>"}`
    Challenge { challenge: String },
    /// `{"error": "<message>"}`
    Error { error: String },
}

impl Response {
    pub fn success() -> Self {
        Self::Success { success: true }
    }

    pub fn challenge(challenge: &Challenge) -> Self {
        Self::Challenge {
            challenge: STANDARD.encode(challenge.as_bytes()),
        }
    }

    pub fn error(message: &str) -> Self {
        Self::Error {
            error: message.to_owned(),
        }
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Decode a base64 value sent by a client.
pub fn decode_base64(value: &str) -> Option<Vec<u8>> {
    STANDARD.decode(value.trim()).ok()
}
