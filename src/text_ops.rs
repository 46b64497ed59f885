// src/text_ops.rs
//! Text encryption — UTF-8 framing over the buffer cipher, nothing more

use crate::aliases::Password;
use crate::crypto::{decrypt_payload, encrypt_bytes, EncryptOptions};
use crate::error::{CoreError, Result};
use crate::payload::EncryptedPayload;

/// Decrypted text plus the integrity flag carried up from the buffer
/// cipher.
pub struct DecryptedText {
    pub text: String,
    pub verified: bool,
}

/// Encrypt a UTF-8 string.
pub fn encrypt_text(text: &str, password: &Password) -> Result<EncryptedPayload> {
    encrypt_bytes(text.as_bytes(), password, &EncryptOptions::default())
}

/// Decrypt a payload produced by [`encrypt_text`].
pub fn decrypt_text(payload: &EncryptedPayload, password: &Password) -> Result<DecryptedText> {
    let decrypted = decrypt_payload(payload, password)?;
    let text = String::from_utf8(decrypted.data)
        .map_err(|_| CoreError::InvalidFormat("decrypted payload is not valid UTF-8".into()))?;
    Ok(DecryptedText {
        text,
        verified: decrypted.verified,
    })
}
