// src/consts.rs
//! Shared constants — format version 1 security parameters
//!
//! Changing any of these invalidates every previously produced record;
//! the payload `version` field exists so a future implementation can
//! branch on older constants instead.

/// Salt length for PBKDF2 key derivation (bytes)
pub const SALT_LEN: usize = 16;

/// AES-GCM initialization vector length (bytes)
pub const IV_LEN: usize = 12;

/// AES-GCM authentication tag length (bytes)
pub const TAG_LEN: usize = 16;

/// Derived symmetric key length (bytes, AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 iteration count
// ~0.1–0.2s on modern hardware — the cost that makes brute force expensive
pub const PBKDF2_ITERATIONS: u32 = 150_000;

/// The payload format version this build produces and accepts
pub const PAYLOAD_VERSION: u32 = 1;

/// Minimum accepted password length for encryption (characters)
pub const MIN_PASSWORD_LEN: usize = 8;

/// Chunk size for the streaming file cipher (bytes, multiple of the AES block)
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// MIME type reported when the extension lookup finds nothing
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
