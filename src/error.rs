// src/error.rs
//! Public error type for the entire crate
//!
//! Classification is typed end to end: the AEAD primitive reports tag
//! mismatch as `Err`, never by exception message text, so no variant here
//! is ever produced by string matching.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    /// GCM tag mismatch on an in-band payload. Indistinguishable from
    /// tampering without out-of-band knowledge.
    #[error("decryption failed: wrong password or corrupted data")]
    WrongPassword,

    /// Tag mismatch against an out-of-band (metadata-supplied) tag.
    #[error("integrity check failed: data does not match its authentication tag")]
    IntegrityCheckFailed,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("invalid payload format: {0}")]
    InvalidFormat(String),

    #[error("unsupported payload version: {0}")]
    UnsupportedVersion(u32),

    #[error("missing required field: {0}")]
    MissingFields(&'static str),

    #[error("invalid KDF parameter: {0}")]
    InvalidKdfParams(&'static str),

    #[error("file error: {0}")]
    File(#[from] std::io::Error),

    #[error("unexpected failure: {0}")]
    Unknown(String),
}
