//! Test harnesses for daemon E2E tests.
//!
//! Connections run over `tokio::io::duplex` so no sockets are opened.

use std::sync::OnceLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPrivateKey};
use serde_json::{Value, json};
use sha2::{Digest, Sha512};
use tokio::io::{AsyncWriteExt, DuplexStream};
use trustshift_auth::{Authenticator, MemoryRegistry};
use trustshift_daemon::AuthService;
use trustshift_daemon::config::DEFAULT_MAX_FRAME_SIZE;
use trustshift_daemon::framing::{FrameError, read_frame, write_frame};
use trustshift_daemon::server::handle_connection;

/// Browser-side key material.
pub struct TestClient {
    pub signing: RsaPrivateKey,
    pub encryption: RsaPrivateKey,
}

impl TestClient {
    pub fn alice() -> &'static TestClient {
        static CLIENT: OnceLock<TestClient> = OnceLock::new();
        CLIENT.get_or_init(TestClient::generate)
    }

    pub fn mallory() -> &'static TestClient {
        static CLIENT: OnceLock<TestClient> = OnceLock::new();
        CLIENT.get_or_init(TestClient::generate)
    }

    fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing: RsaPrivateKey::new(&mut rng, 2048).expect("RSA key generation failed"),
            encryption: RsaPrivateKey::new(&mut rng, 2048).expect("RSA key generation failed"),
        }
    }

    /// SPKI PEM with the body on one line, as WebCrypto exports it.
    pub fn signing_pem(&self) -> String {
        single_line_pem(&self.signing)
    }

    pub fn encryption_pem(&self) -> String {
        single_line_pem(&self.encryption)
    }

    /// Base64 PSS/SHA-512 signature with maximum salt.
    pub fn sign_b64(&self, challenge: &[u8]) -> String {
        let salt_len = (self.signing.n().bits() - 1).div_ceil(8) - 64 - 2;
        let hashed = Sha512::digest(challenge);
        let signature = self
            .signing
            .sign_with_rng(
                &mut rand::thread_rng(),
                Pss::new_with_salt::<Sha512>(salt_len),
                &hashed,
            )
            .expect("PSS signing failed");
        STANDARD.encode(signature)
    }
}

fn single_line_pem(key: &RsaPrivateKey) -> String {
    let pem = key
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .expect("SPKI encoding failed");
    let body: String = pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    format!("-----BEGIN PUBLIC KEY-----\n{body}\n-----END PUBLIC KEY-----")
}

/// An in-process daemon sharing one registry across connections.
pub struct TestDaemon {
    pub service: AuthService,
    pub max_frame_size: usize,
}

impl TestDaemon {
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            service: AuthService::new(Authenticator::new(MemoryRegistry::new())),
            max_frame_size,
        }
    }

    /// Open a new client connection served on a background task.
    pub fn connect(&self) -> TestConnection {
        let (client, server) = tokio::io::duplex(self.max_frame_size * 2);
        tokio::spawn(handle_connection(
            server,
            self.service.clone(),
            self.max_frame_size,
        ));
        TestConnection {
            stream: client,
            max_frame_size: self.max_frame_size,
        }
    }
}

/// Client half of a daemon connection.
pub struct TestConnection {
    stream: DuplexStream,
    max_frame_size: usize,
}

impl TestConnection {
    /// Send one request and wait for its response.
    pub async fn call(&mut self, request: Value) -> Value {
        let body = serde_json::to_vec(&request).expect("request encodes");
        self.call_raw(&body).await.expect("daemon answered")
    }

    /// Send raw frame bytes.
    pub async fn call_raw(&mut self, body: &[u8]) -> Result<Value, FrameError> {
        // Client side allows oversize frames so the server's limit is what gets tested
        write_frame(&mut self.stream, body, usize::MAX).await?;
        self.read_response().await
    }

    /// Write a bare length prefix with no payload.
    pub async fn send_length_prefix(&mut self, len: u32) {
        self.stream
            .write_all(&len.to_be_bytes())
            .await
            .expect("prefix written");
    }

    pub async fn read_response(&mut self) -> Result<Value, FrameError> {
        let frame = read_frame(&mut self.stream, self.max_frame_size).await?;
        Ok(serde_json::from_slice(&frame).expect("response is JSON"))
    }

    pub async fn register(&mut self, username: &str, client: &TestClient) -> Value {
        self.call(json!({
            "op": "register",
            "username": username,
            "sign_key": client.signing_pem(),
            "enc_key": client.encryption_pem(),
        }))
        .await
    }

    /// Request a challenge and return its raw bytes.
    pub async fn get_challenge(&mut self, username: &str) -> Vec<u8> {
        let response = self
            .call(json!({"op": "get_challenge", "username": username}))
            .await;
        let challenge = response["challenge"]
            .as_str()
            .unwrap_or_else(|| panic!("expected challenge, got {response}"));
        STANDARD.decode(challenge).expect("challenge is base64")
    }

    pub async fn verify(&mut self, username: &str, challenge_response: &str) -> Value {
        self.call(json!({
            "op": "verify_challenge",
            "username": username,
            "challengeResponse": challenge_response,
        }))
        .await
    }
}
