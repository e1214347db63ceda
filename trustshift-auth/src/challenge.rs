//! Authentication challenges.
//!
//! A challenge is 32 random bytes bound to one identity. The client signs
//! the raw bytes; the server keeps at most one outstanding challenge per
//! identity and consumes it on the first verification attempt.

use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

/// Length of a challenge in bytes.
pub const CHALLENGE_LEN: usize = 32;

/// A random challenge issued to a client.
///
/// Drawn from the operating system CSPRNG, never from a seeded generator.
#[derive(Clone, Eq)]
pub struct Challenge([u8; CHALLENGE_LEN]);

impl Challenge {
    /// Generate a new random challenge.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; CHALLENGE_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create a challenge from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; CHALLENGE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw challenge bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; CHALLENGE_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Challenge {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for Challenge {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl std::fmt::Debug for Challenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 4 bytes are enough to tell challenges apart in test output
        write!(
            f,
            "Challenge({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}
