// src/kdf.rs
//! PBKDF2 key derivation
//!
//! Stretches a password + salt into a fixed-length symmetric key.
//! Deterministic: the same password and salt always yield the same key;
//! different salts or passwords yield different keys.
//!
//! The whole crate is synchronous, so there is no separate sync variant:
//! `derive_key` runs its 150,000 iterations on the calling thread. Callers
//! that must not block wrap it in their own worker thread.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::{Sha256, Sha512};
use secure_gate::{RevealSecret, RevealSecretMut};

use crate::aliases::{DerivedKey32, KeyBytes, Password};
use crate::consts::{KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
use crate::error::{CoreError, Result};
use crate::rng::random_array;

/// A stretched key plus the parameters that produced it.
///
/// The key zeroizes when this struct drops; the salt and iteration count
/// are non-secret and belong in the encrypted record.
pub struct DerivedKey {
    pub key: DerivedKey32,
    pub salt: [u8; SALT_LEN],
    pub iterations: u32,
}

/// Digest selector for [`derive_key_custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KdfDigest {
    #[default]
    Sha256,
    Sha512,
}

/// Fully custom derivation parameters for interoperability with
/// differently-configured legacy records.
#[derive(Debug, Clone)]
pub struct KdfParams {
    pub iterations: u32,
    pub key_length: usize,
    pub digest: KdfDigest,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
            key_length: KEY_LEN,
            digest: KdfDigest::Sha256,
        }
    }
}

/// Derive a 256-bit key with the format's fixed parameters.
///
/// A missing salt is replaced by 16 fresh random bytes; pass an explicit
/// salt only to re-derive the key for an existing record or in
/// deterministic tests.
pub fn derive_key(password: &Password, salt: Option<[u8; SALT_LEN]>) -> Result<DerivedKey> {
    if password.expose_secret().is_empty() {
        return Err(CoreError::EmptyPassword);
    }

    let salt = match salt {
        Some(salt) => salt,
        None => random_array()?,
    };

    let mut key = DerivedKey32::new([0u8; KEY_LEN]);
    pbkdf2::<Hmac<Sha256>>(
        password.expose_secret().as_bytes(),
        &salt,
        PBKDF2_ITERATIONS,
        key.expose_secret_mut(),
    )
    .map_err(|e| CoreError::Unknown(format!("PBKDF2 failed: {e}")))?;

    Ok(DerivedKey {
        key,
        salt,
        iterations: PBKDF2_ITERATIONS,
    })
}

/// Derive a key with caller-chosen iterations, length, and digest.
///
/// Exists for legacy records produced under other parameters; the salt
/// length is unconstrained here for the same reason. New records always
/// go through [`derive_key`].
pub fn derive_key_custom(password: &Password, salt: &[u8], params: &KdfParams) -> Result<KeyBytes> {
    if password.expose_secret().is_empty() {
        return Err(CoreError::EmptyPassword);
    }
    if params.iterations < 1 {
        return Err(CoreError::InvalidKdfParams("iterations must be >= 1"));
    }
    if params.key_length < 1 {
        return Err(CoreError::InvalidKdfParams("key_length must be >= 1"));
    }

    let mut out = vec![0u8; params.key_length];
    let derived = match params.digest {
        KdfDigest::Sha256 => pbkdf2::<Hmac<Sha256>>(
            password.expose_secret().as_bytes(),
            salt,
            params.iterations,
            &mut out,
        ),
        KdfDigest::Sha512 => pbkdf2::<Hmac<Sha512>>(
            password.expose_secret().as_bytes(),
            salt,
            params.iterations,
            &mut out,
        ),
    };
    derived.map_err(|e| CoreError::Unknown(format!("PBKDF2 failed: {e}")))?;

    Ok(KeyBytes::new(out))
}
