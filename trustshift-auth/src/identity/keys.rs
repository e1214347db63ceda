//! RSA public keys submitted by clients.
//!
//! Keys arrive as PEM text, either SubjectPublicKeyInfo
//! (`BEGIN PUBLIC KEY`, what WebCrypto exports as `spki`) or PKCS#1
//! (`BEGIN RSA PUBLIC KEY`). Browsers emit the base64 body as one long
//! line, so the body is re-wrapped before it reaches the strict PEM decoder.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rsa::pkcs1::{self, DecodeRsaPublicKey};
use rsa::pkcs8::{self, DecodePublicKey, EncodePublicKey, spki};
use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

/// Smallest accepted RSA modulus.
pub const MIN_MODULUS_BITS: usize = 2048;

/// Output size of SHA-512 in bytes.
pub const SHA512_DIGEST_LEN: usize = 64;

/// Maximum accepted PEM input (a 4096-bit SPKI key is well under 1KB).
const MAX_PEM_LEN: usize = 16 * 1024;

/// Line width used when re-wrapping PEM bodies.
const PEM_LINE_WIDTH: usize = 64;

/// Errors that can occur while decoding a public key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum KeyError {
    /// The input is not UTF-8 PEM text with a recognised label.
    #[error("invalid key encoding")]
    InvalidEncoding,

    /// The input exceeds the accepted size.
    #[error("key input too large: {len} bytes (max {max})", max = MAX_PEM_LEN)]
    TooLarge { len: usize },

    /// The key is well formed but not an RSA key.
    #[error("unsupported key algorithm")]
    UnsupportedAlgorithm,

    /// The RSA modulus is shorter than [`MIN_MODULUS_BITS`].
    #[error("key too small: {bits} bits (min {min})", min = MIN_MODULUS_BITS)]
    KeyTooSmall { bits: usize },

    /// The key material is structurally invalid.
    #[error("invalid key")]
    InvalidKey,
}

/// Which of an identity's two keys a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// RSA-PSS key used to verify challenge signatures.
    Signing,
    /// RSA-OAEP key, stored for a future encrypted channel.
    Encryption,
}

impl std::fmt::Display for KeyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Signing => write!(f, "signing"),
            Self::Encryption => write!(f, "encryption"),
        }
    }
}

/// Decode raw PEM bytes into a [`PublicKey`].
///
/// # Errors
///
/// Returns `KeyError::InvalidEncoding` if the bytes are not UTF-8, plus
/// every error of [`PublicKey::from_pem`].
pub fn decode_public_key(bytes: &[u8]) -> Result<PublicKey, KeyError> {
    if bytes.len() > MAX_PEM_LEN {
        return Err(KeyError::TooLarge { len: bytes.len() });
    }
    let pem = std::str::from_utf8(bytes).map_err(|_| KeyError::InvalidEncoding)?;
    PublicKey::from_pem(pem)
}

/// PEM labels we know how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PemLabel {
    Spki,
    Pkcs1,
}

impl PemLabel {
    const ALL: [Self; 2] = [Self::Spki, Self::Pkcs1];

    fn header(self) -> &'static str {
        match self {
            Self::Spki => "-----BEGIN PUBLIC KEY-----",
            Self::Pkcs1 => "-----BEGIN RSA PUBLIC KEY-----",
        }
    }

    fn footer(self) -> &'static str {
        match self {
            Self::Spki => "-----END PUBLIC KEY-----",
            Self::Pkcs1 => "-----END RSA PUBLIC KEY-----",
        }
    }
}

/// Detect the PEM label and re-emit the document with a 64-column body.
fn normalize_pem(pem: &str) -> Result<(PemLabel, String), KeyError> {
    let pem = pem.trim();
    let label = PemLabel::ALL
        .into_iter()
        .find(|label| pem.starts_with(label.header()))
        .ok_or(KeyError::InvalidEncoding)?;

    let body = pem
        .strip_prefix(label.header())
        .and_then(|rest| rest.strip_suffix(label.footer()))
        .ok_or(KeyError::InvalidEncoding)?;

    let body: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if body.is_empty() || !body.is_ascii() {
        return Err(KeyError::InvalidEncoding);
    }

    let mut out = String::with_capacity(body.len() + body.len() / PEM_LINE_WIDTH + 64);
    out.push_str(label.header());
    out.push('\n');
    for line in body.as_bytes().chunks(PEM_LINE_WIDTH) {
        // Body is ASCII, so every chunk boundary is a char boundary
        out.push_str(std::str::from_utf8(line).map_err(|_| KeyError::InvalidEncoding)?);
        out.push('\n');
    }
    out.push_str(label.footer());
    out.push('\n');

    Ok((label, out))
}

/// A decoded RSA public key.
///
/// Carries everything the verifier needs: the key itself, its modulus size
/// and a fingerprint for display and logging.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    key: RsaPublicKey,
    bits: usize,
    fingerprint: Fingerprint,
}

impl PublicKey {
    /// Parse a PEM encoded RSA public key.
    ///
    /// # Errors
    ///
    /// - `KeyError::InvalidEncoding` if the text is not a recognised PEM document
    /// - `KeyError::UnsupportedAlgorithm` if the SPKI names a non-RSA algorithm
    /// - `KeyError::KeyTooSmall` if the modulus is below [`MIN_MODULUS_BITS`]
    /// - `KeyError::InvalidKey` for any other structural problem, including
    ///   moduli above 4096 bits
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        if pem.len() > MAX_PEM_LEN {
            return Err(KeyError::TooLarge { len: pem.len() });
        }

        let (label, pem) = normalize_pem(pem)?;
        let key = match label {
            PemLabel::Spki => RsaPublicKey::from_public_key_pem(&pem).map_err(spki_error)?,
            PemLabel::Pkcs1 => RsaPublicKey::from_pkcs1_pem(&pem).map_err(pkcs1_error)?,
        };

        Self::from_rsa(key)
    }

    /// Wrap an already parsed RSA key, enforcing the size floor.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::KeyTooSmall` if the modulus is below
    /// [`MIN_MODULUS_BITS`].
    pub fn from_rsa(key: RsaPublicKey) -> Result<Self, KeyError> {
        let bits = key.n().bits();
        if bits < MIN_MODULUS_BITS {
            return Err(KeyError::KeyTooSmall { bits });
        }

        let der = key.to_public_key_der().map_err(|_| KeyError::InvalidKey)?;
        let fingerprint = Fingerprint::from_spki_der(der.as_bytes());

        Ok(Self {
            key,
            bits,
            fingerprint,
        })
    }

    /// Name of the key algorithm.
    #[must_use]
    pub fn algorithm(&self) -> &'static str {
        "RSA"
    }

    /// Modulus length in bits.
    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        self.bits
    }

    /// Fingerprint of the SPKI encoding of this key.
    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// The underlying RSA key.
    #[must_use]
    pub fn as_rsa(&self) -> &RsaPublicKey {
        &self.key
    }

    /// Largest PSS salt this key can carry with a SHA-512 digest.
    ///
    /// `ceil((modBits - 1) / 8) - 64 - 2`, the same figure WebCrypto signers
    /// compute for `saltLength`.
    #[must_use]
    pub fn max_pss_salt_len(&self) -> usize {
        let em_len = (self.bits - 1).div_ceil(8);
        em_len - SHA512_DIGEST_LEN - 2
    }

    /// Verify an RSA-PSS signature over `message`.
    ///
    /// Digest and MGF1 are both SHA-512 and the salt length must be exactly
    /// [`max_pss_salt_len`](Self::max_pss_salt_len). Any failure, including a
    /// signature of the wrong length, returns `false`.
    #[must_use]
    pub fn verify_pss_sha512(&self, message: &[u8], signature: &[u8]) -> bool {
        let hashed = Sha512::digest(message);
        let scheme = Pss::new_with_salt::<Sha512>(self.max_pss_salt_len());
        self.key.verify(scheme, &hashed, signature).is_ok()
    }
}

fn spki_error(e: spki::Error) -> KeyError {
    match e {
        spki::Error::OidUnknown { .. } => KeyError::UnsupportedAlgorithm,
        spki::Error::Asn1(_) => KeyError::InvalidEncoding,
        _ => KeyError::InvalidKey,
    }
}

// PKCS#1 keys are decoded through an SPKI wrapper, so SPKI errors come back nested
fn pkcs1_error(e: pkcs1::Error) -> KeyError {
    match e {
        pkcs1::Error::Asn1(_) | pkcs1::Error::Pkcs8(pkcs8::Error::Asn1(_)) => {
            KeyError::InvalidEncoding
        }
        pkcs1::Error::Pkcs8(pkcs8::Error::PublicKey(e)) => spki_error(e),
        _ => KeyError::InvalidKey,
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey(RSA-{}, {})", self.bits, self.fingerprint)
    }
}

/// A SHA-256 fingerprint of a public key's SPKI DER encoding.
///
/// Format: `SHA256:{url_safe_base64_no_padding}`
///
/// # Security
///
/// Comparisons use constant-time equality. `Hash` stays derived because the
/// fingerprint is public information.
#[derive(Clone, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::derived_hash_with_manual_eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The prefix used for fingerprint strings.
    pub const PREFIX: &'static str = "SHA256:";

    /// Compute the fingerprint of DER encoded SubjectPublicKeyInfo bytes.
    #[must_use]
    pub fn from_spki_der(der: &[u8]) -> Self {
        let hash = Sha256::digest(der);
        Self(format!("{}{}", Self::PREFIX, URL_SAFE_NO_PAD.encode(hash)))
    }

    /// Get the fingerprint as a string reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({})", self.0)
    }
}
