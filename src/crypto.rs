// src/crypto.rs
//! Pure in-memory cryptographic primitives — no I/O
//!
//! The buffer cipher everything else builds on: AES-256-GCM with a key
//! derived per call, no associated data, and a detached 16-byte tag.
//! Every operation derives its own key and drops (zeroizes) it before
//! returning, success or failure.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use secure_gate::RevealSecret;

use crate::aliases::Password;
use crate::consts::{IV_LEN, MIN_PASSWORD_LEN, PAYLOAD_VERSION, SALT_LEN, TAG_LEN};
use crate::error::{CoreError, Result};
use crate::kdf::derive_key;
use crate::memory::secure_wipe;
use crate::payload::{EncryptedPayload, EncryptedPayloadRaw};
use crate::rng::random_array;

/// Optional salt/IV injection. Leave both `None` outside deterministic
/// tests — fresh randomness per call is the defense against
/// plaintext-pattern leakage.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncryptOptions {
    pub salt: Option<[u8; SALT_LEN]>,
    pub iv: Option<[u8; IV_LEN]>,
}

/// Decryption result. `verified` is true on every success path — plaintext
/// is only ever returned after the tag checks out.
pub struct Decrypted {
    pub data: Vec<u8>,
    pub verified: bool,
}

/// Encrypt a byte sequence into the binary payload form.
///
/// Accepts anything byte-like (raw bytes, a buffer, a UTF-8 string).
pub fn encrypt_raw(
    data: impl AsRef<[u8]>,
    password: &Password,
    opts: &EncryptOptions,
) -> Result<EncryptedPayloadRaw> {
    check_password_strength(password)?;

    let iv = match opts.iv {
        Some(iv) => iv,
        None => random_array()?,
    };
    let derived = derive_key(password, opts.salt)?;

    let cipher = Aes256Gcm::new_from_slice(derived.key.expose_secret())
        .map_err(|e| CoreError::Unknown(format!("cipher init failed: {e}")))?;
    let mut sealed = cipher
        .encrypt(Nonce::from_slice(&iv), data.as_ref())
        .map_err(|_| CoreError::Unknown("AES-GCM encryption failed".into()))?;

    // aes-gcm appends the tag; the record format keeps it detached
    let tag_start = sealed.len() - TAG_LEN;
    let tag = sealed.split_off(tag_start);
    let mut auth_tag = [0u8; TAG_LEN];
    auth_tag.copy_from_slice(&tag);

    Ok(EncryptedPayloadRaw {
        cipher_text: sealed,
        salt: derived.salt,
        iv,
        auth_tag,
        version: PAYLOAD_VERSION,
    })
}

/// Encrypt a byte sequence into the transportable payload form.
pub fn encrypt_bytes(
    data: impl AsRef<[u8]>,
    password: &Password,
    opts: &EncryptOptions,
) -> Result<EncryptedPayload> {
    encrypt_raw(data, password, opts).map(|raw| raw.encode())
}

/// Decrypt a binary payload. The key is re-derived from the stored salt;
/// a tag mismatch surfaces as [`CoreError::WrongPassword`] — at this
/// layer a wrong password and tampering are indistinguishable.
pub fn decrypt_raw(payload: &EncryptedPayloadRaw, password: &Password) -> Result<Decrypted> {
    if password.expose_secret().is_empty() {
        return Err(CoreError::EmptyPassword);
    }
    if payload.version != PAYLOAD_VERSION {
        return Err(CoreError::UnsupportedVersion(payload.version));
    }

    let derived = derive_key(password, Some(payload.salt))?;
    let cipher = Aes256Gcm::new_from_slice(derived.key.expose_secret())
        .map_err(|e| CoreError::Unknown(format!("cipher init failed: {e}")))?;

    let mut sealed = Vec::with_capacity(payload.cipher_text.len() + TAG_LEN);
    sealed.extend_from_slice(&payload.cipher_text);
    sealed.extend_from_slice(&payload.auth_tag);

    // The primitive reports authentication failure as a typed Err, so no
    // plaintext (partial or otherwise) can escape this call.
    let data = cipher
        .decrypt(Nonce::from_slice(&payload.iv), sealed.as_slice())
        .map_err(|_| CoreError::WrongPassword)?;

    Ok(Decrypted {
        data,
        verified: true,
    })
}

/// Decrypt a transportable payload: structural parse first (cheap
/// fail-fast), key derivation and GCM only for well-formed records.
pub fn decrypt_payload(payload: &EncryptedPayload, password: &Password) -> Result<Decrypted> {
    if password.expose_secret().is_empty() {
        return Err(CoreError::EmptyPassword);
    }
    let raw = payload.parse()?;
    decrypt_raw(&raw, password)
}

/// Re-encrypt a payload under a new password with fresh salt and IV.
/// Pure byte transformation — no I/O, the intermediate plaintext is wiped
/// before this returns.
pub fn rotate_password(
    payload: &EncryptedPayload,
    old_password: &Password,
    new_password: &Password,
) -> Result<EncryptedPayload> {
    let decrypted = decrypt_payload(payload, old_password)?;
    let mut data = decrypted.data;
    let rotated = encrypt_bytes(&data, new_password, &EncryptOptions::default());
    secure_wipe(&mut data);
    rotated
}

pub(crate) fn check_password_strength(password: &Password) -> Result<()> {
    let len = password.expose_secret().chars().count();
    if len == 0 {
        return Err(CoreError::EmptyPassword);
    }
    if len < MIN_PASSWORD_LEN {
        return Err(CoreError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}
