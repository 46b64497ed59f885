// src/file_ops.rs
//! Whole-file encryption/decryption operations
//!
//! Read-fully → buffer cipher → write, plus production and consumption of
//! the file metadata record. The ciphertext file holds ciphertext bytes
//! only; salt, IV, and tag travel in [`EncryptionMetadata`], which is
//! meant to be persisted separately.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use secure_gate::RevealSecret;

use crate::aliases::Password;
use crate::consts::{IV_LEN, PAYLOAD_VERSION, SALT_LEN, TAG_LEN};
use crate::crypto::{decrypt_raw, encrypt_raw, EncryptOptions};
use crate::error::{CoreError, Result};
use crate::memory::secure_wipe;
use crate::mime::mime_for_path;
use crate::payload::{decode_fixed, EncryptedPayloadRaw};

/// The non-secret parameters needed to reverse a file encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionMetadata {
    pub salt: String,
    pub iv: String,
    pub auth_tag: String,
    pub original_file_name: String,
    pub mime_type: String,
    pub original_size: u64,
    pub version: u32,
    pub encrypted_at: DateTime<Utc>,
}

impl EncryptionMetadata {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::InvalidFormat(format!("metadata serialization failed: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidFormat(format!("metadata is not valid JSON: {e}")))
    }

    /// Decode the binary fields, checking presence, encoding, lengths,
    /// and version — in that order, before any cryptographic work.
    pub(crate) fn decode(&self) -> Result<([u8; SALT_LEN], [u8; IV_LEN], [u8; TAG_LEN])> {
        if self.salt.is_empty() {
            return Err(CoreError::MissingFields("salt"));
        }
        if self.iv.is_empty() {
            return Err(CoreError::MissingFields("iv"));
        }
        if self.auth_tag.is_empty() {
            return Err(CoreError::MissingFields("authTag"));
        }

        let salt = decode_fixed::<SALT_LEN>("salt", &self.salt)?;
        let iv = decode_fixed::<IV_LEN>("iv", &self.iv)?;
        let auth_tag = decode_fixed::<TAG_LEN>("authTag", &self.auth_tag)?;

        if self.version != PAYLOAD_VERSION {
            return Err(CoreError::UnsupportedVersion(self.version));
        }

        Ok((salt, iv, auth_tag))
    }
}

/// Result of a whole-file or streaming decryption.
pub struct DecryptedFile {
    pub output_path: PathBuf,
    pub original_file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub verified: bool,
}

/// Encrypt a file on disk.
///
/// Reads the input fully, encrypts in memory, writes the ciphertext, and
/// wipes the plaintext buffer. The output's parent directory is created
/// if absent.
pub fn encrypt_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    password: &Password,
    opts: &EncryptOptions,
) -> Result<EncryptionMetadata> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    require_regular_file(input_path)?;
    let mut plaintext = fs::read(input_path)?;
    let original_size = plaintext.len() as u64;

    let encrypted = encrypt_raw(&plaintext, password, opts);
    secure_wipe(&mut plaintext);
    let raw = encrypted?;

    ensure_parent_dir(output_path)?;
    write_or_cleanup(output_path, &raw.cipher_text)?;
    debug!(
        input = %input_path.display(),
        output = %output_path.display(),
        size = original_size,
        "encrypted file"
    );

    Ok(build_metadata(
        input_path,
        original_size,
        &raw.salt,
        &raw.iv,
        &raw.auth_tag,
    ))
}

/// Decrypt a file on disk.
///
/// The metadata is decoded before key derivation so malformed records
/// fail before the expensive work. If writing the plaintext fails after
/// the output file was created, the partial file is deleted before the
/// error propagates — a caller never observes a truncated output.
pub fn decrypt_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    metadata: &EncryptionMetadata,
    password: &Password,
) -> Result<DecryptedFile> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    require_regular_file(input_path)?;
    if password.expose_secret().is_empty() {
        return Err(CoreError::EmptyPassword);
    }
    let (salt, iv, auth_tag) = metadata.decode()?;

    let cipher_text = fs::read(input_path)?;
    let raw = EncryptedPayloadRaw {
        cipher_text,
        salt,
        iv,
        auth_tag,
        version: metadata.version,
    };
    let decrypted = decrypt_raw(&raw, password)?;

    ensure_parent_dir(output_path)?;
    write_or_cleanup(output_path, &decrypted.data)?;
    debug!(
        input = %input_path.display(),
        output = %output_path.display(),
        size = decrypted.data.len(),
        "decrypted file"
    );

    Ok(DecryptedFile {
        output_path: output_path.to_path_buf(),
        original_file_name: metadata.original_file_name.clone(),
        mime_type: metadata.mime_type.clone(),
        size: decrypted.data.len() as u64,
        verified: decrypted.verified,
    })
}

/// Persist metadata as JSON next to wherever the caller keeps it.
pub fn write_metadata_file<P: AsRef<Path>>(path: P, metadata: &EncryptionMetadata) -> Result<()> {
    let json = metadata.to_json()?;
    ensure_parent_dir(path.as_ref())?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

/// Load metadata previously written by [`write_metadata_file`].
pub fn read_metadata_file<P: AsRef<Path>>(path: P) -> Result<EncryptionMetadata> {
    let json = fs::read_to_string(path.as_ref())?;
    EncryptionMetadata::from_json(&json)
}

pub(crate) fn build_metadata(
    input_path: &Path,
    original_size: u64,
    salt: &[u8; SALT_LEN],
    iv: &[u8; IV_LEN],
    auth_tag: &[u8; TAG_LEN],
) -> EncryptionMetadata {
    EncryptionMetadata {
        salt: STANDARD.encode(salt),
        iv: STANDARD.encode(iv),
        auth_tag: STANDARD.encode(auth_tag),
        original_file_name: input_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        mime_type: mime_for_path(input_path).to_string(),
        original_size,
        version: PAYLOAD_VERSION,
        encrypted_at: Utc::now(),
    }
}

pub(crate) fn require_regular_file(path: &Path) -> Result<()> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Err(CoreError::File(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not a regular file: {}", path.display()),
        )));
    }
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_or_cleanup(path: &Path, data: &[u8]) -> Result<()> {
    if let Err(err) = fs::write(path, data) {
        warn!(path = %path.display(), "removing partial output after failed write");
        let _ = fs::remove_file(path);
        return Err(err.into());
    }
    Ok(())
}
