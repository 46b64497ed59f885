// src/aliases.rs
//! Secure memory type aliases
//!
//! These are the canonical secret types used throughout docvault-crypto.
//! All of them zeroize on drop and require explicit `.expose_secret()`
//! to access the underlying data — drop runs on every exit path, which is
//! what guarantees key material is wiped on success and failure alike.

use secure_gate::{dynamic_alias, fixed_alias};

// ─────────────────────────────────────────────────────────────────────────────
// Dynamic secrets
// ─────────────────────────────────────────────────────────────────────────────
dynamic_alias!(pub Password, String); // user secret, never persisted
dynamic_alias!(pub KeyBytes, Vec<u8>); // custom-length KDF output (legacy interop)

// ─────────────────────────────────────────────────────────────────────────────
// Fixed-size secrets
// ─────────────────────────────────────────────────────────────────────────────
fixed_alias!(pub DerivedKey32, 32); // 256-bit AES-GCM key from PBKDF2
