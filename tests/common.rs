// tests/common.rs
//! Shared test utilities — logging setup

use docvault_crypto::Password;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize test-friendly logging.
/// Call once at the start of any test that needs logs.
#[allow(dead_code)]
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer()) // pretty + works in `cargo test`
        .with(EnvFilter::from_default_env()) // respects RUST_LOG=
        .try_init()
        .ok(); // idempotent — safe to call multiple times
}

#[allow(dead_code)]
pub fn password(s: &str) -> Password {
    Password::new(s.to_string())
}
