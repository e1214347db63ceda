pub mod harness;

pub use harness::{TestClient, TestDaemon};
