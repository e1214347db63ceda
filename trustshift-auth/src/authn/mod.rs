//! Registration, challenge issuance and signature verification.

mod authenticator;
mod error;
mod verify;

pub use authenticator::Authenticator;
pub use error::{AuthnError, ChallengeError, RegisterError};
pub use verify::{VerifiedIdentity, issue_challenge, verify_challenge_response};
