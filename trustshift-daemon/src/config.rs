//! Server configuration.

use std::net::SocketAddr;

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:7878";

/// Default maximum frame size in bytes.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

/// Hard ceiling on the configurable frame size (16 MiB).
pub const MAX_FRAME_SIZE_LIMIT: usize = 16 * 1024 * 1024;

/// Smallest frame that still fits a registration with two 4096-bit keys.
pub const MIN_FRAME_SIZE: usize = 4 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max frame size {size} is out of range ({min}..={max})")]
    FrameSizeOutOfRange { size: usize, min: usize, max: usize },
}

/// Runtime settings for the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub max_frame_size: usize,
}

impl ServerConfig {
    /// Build a validated configuration.
    pub fn new(listen_addr: SocketAddr, max_frame_size: usize) -> Result<Self, ConfigError> {
        if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE_LIMIT).contains(&max_frame_size) {
            return Err(ConfigError::FrameSizeOutOfRange {
                size: max_frame_size,
                min: MIN_FRAME_SIZE,
                max: MAX_FRAME_SIZE_LIMIT,
            });
        }
        Ok(Self {
            listen_addr,
            max_frame_size,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 7878)),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}
