// src/lib.rs
//! docvault-crypto — password-based authenticated encryption for payloads and files
//!
//! Features:
//! - PBKDF2-HMAC-SHA256 key stretching (150,000 iterations)
//! - AES-256-GCM with detached authentication tags (format version 1)
//! - Whole-file and bounded-memory streaming encryption with progress reporting
//! - Typed failure taxonomy: wrong password vs. tampering vs. malformed input
//! - Key material zeroized on every exit path via secure-gate
//!
//! The engine is a pure byte transformation: callers supply a password
//! (never persisted) plus bytes or file paths, and get back either
//! plaintext-with-proof-of-integrity or a classified failure. Where
//! ciphertext and metadata are stored, and who may request decryption,
//! are the surrounding system's problems — not this crate's.

pub mod aliases;
pub mod consts;
pub mod crypto;
pub mod error;
pub mod file_ops;
pub mod kdf;
pub mod memory;
pub mod mime;
pub mod payload;
pub mod rng;
pub mod stream;
pub mod text_ops;

// Re-export everything users need at the crate root
pub use aliases::{DerivedKey32, KeyBytes, Password};
pub use crypto::{
    decrypt_payload, decrypt_raw, encrypt_bytes, encrypt_raw, rotate_password, Decrypted,
    EncryptOptions,
};
pub use error::{CoreError, Result};
pub use file_ops::{
    decrypt_file, encrypt_file, read_metadata_file, write_metadata_file, DecryptedFile,
    EncryptionMetadata,
};
pub use kdf::{derive_key, derive_key_custom, DerivedKey, KdfDigest, KdfParams};
pub use memory::secure_wipe;
pub use mime::mime_for_path;
pub use payload::{EncryptedPayload, EncryptedPayloadRaw};
pub use stream::{decrypt_file_stream, encrypt_file_stream, ProgressFn};
pub use text_ops::{decrypt_text, encrypt_text, DecryptedText};
