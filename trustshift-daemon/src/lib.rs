//! Trustshift daemon.
//!
//! Serves the `trustshift-auth` protocol over TCP. Every message is a
//! length-delimited JSON frame (see [`framing`]) carrying a [`wire::Request`]
//! or [`wire::Response`].

pub mod config;
pub mod framing;
pub mod server;
pub mod service;
pub mod wire;

pub use config::ServerConfig;
pub use service::AuthService;
