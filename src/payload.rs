// src/payload.rs
//! Encrypted record shapes and the payload validator
//!
//! [`EncryptedPayload`] is the transportable form (base64 text fields,
//! camelCase on the wire to match what the surrounding system persists);
//! [`EncryptedPayloadRaw`] is the binary form used inside pipelines.
//!
//! Validation is a typed parse, not a side-effecting checker: `parse()`
//! either returns a structurally sound raw payload or says exactly what
//! is wrong. It runs before any key derivation so malformed records fail
//! cheaply.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::consts::{IV_LEN, PAYLOAD_VERSION, SALT_LEN, TAG_LEN};
use crate::error::{CoreError, Result};

/// A self-contained encrypted unit. Created by an encrypt operation,
/// consumed (never mutated) by a decrypt operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPayload {
    pub cipher_text: String,
    pub salt: String,
    pub iv: String,
    pub auth_tag: String,
    pub version: u32,
}

/// Binary twin of [`EncryptedPayload`] for pipelines that must avoid
/// encode/decode overhead.
#[derive(Clone)]
pub struct EncryptedPayloadRaw {
    pub cipher_text: Vec<u8>,
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_LEN],
    pub auth_tag: [u8; TAG_LEN],
    pub version: u32,
}

impl EncryptedPayload {
    /// Structurally validate and decode into the binary form.
    ///
    /// Check order: field presence, base64 well-formedness, decoded
    /// lengths (16/12/16), then version. The ciphertext may legitimately
    /// be empty — GCM of an empty plaintext produces only a tag.
    pub fn parse(&self) -> Result<EncryptedPayloadRaw> {
        if self.salt.is_empty() {
            return Err(CoreError::MissingFields("salt"));
        }
        if self.iv.is_empty() {
            return Err(CoreError::MissingFields("iv"));
        }
        if self.auth_tag.is_empty() {
            return Err(CoreError::MissingFields("authTag"));
        }

        let cipher_text = if self.cipher_text.is_empty() {
            Vec::new()
        } else {
            decode_field("cipherText", &self.cipher_text)?
        };
        let salt = decode_fixed::<SALT_LEN>("salt", &self.salt)?;
        let iv = decode_fixed::<IV_LEN>("iv", &self.iv)?;
        let auth_tag = decode_fixed::<TAG_LEN>("authTag", &self.auth_tag)?;

        if self.version != PAYLOAD_VERSION {
            return Err(CoreError::UnsupportedVersion(self.version));
        }

        Ok(EncryptedPayloadRaw {
            cipher_text,
            salt,
            iv,
            auth_tag,
            version: self.version,
        })
    }

    /// Check structural validity, discarding the decoded result.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        self.parse().map(|_| ())
    }
}

impl EncryptedPayloadRaw {
    /// Encode into the transportable base64 form.
    pub fn encode(&self) -> EncryptedPayload {
        EncryptedPayload {
            cipher_text: STANDARD.encode(&self.cipher_text),
            salt: STANDARD.encode(self.salt),
            iv: STANDARD.encode(self.iv),
            auth_tag: STANDARD.encode(self.auth_tag),
            version: self.version,
        }
    }
}

pub(crate) fn decode_field(name: &'static str, value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|_| CoreError::InvalidFormat(format!("{name} is not valid base64")))
}

pub(crate) fn decode_fixed<const N: usize>(name: &'static str, value: &str) -> Result<[u8; N]> {
    let bytes = decode_field(name, value)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CoreError::InvalidFormat(format!("{name} must be {N} bytes, got {len}")))
}
