// src/stream.rs
//! Streaming file encryption — bounded-memory AES-256-GCM pipeline
//!
//! For inputs too large to buffer: read → transform → write in 64 KiB
//! chunks with a per-chunk progress callback. The cipher core is
//! incremental GCM (CTR keystream plus GHASH over the ciphertext), so the
//! streamed output is byte-identical to the buffer cipher's output for
//! the same key and IV — one record format, two producers.
//!
//! GCM only proves integrity once the final block is processed, so the
//! decryption path never writes to the destination directly: plaintext
//! streams into a temporary file in the same directory and is atomically
//! renamed into place only after the tag verifies. On mismatch the
//! temporary file is deleted — unverified bytes are never observable at
//! the output path.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use aes::cipher::{BlockEncrypt, KeyInit, KeyIvInit, StreamCipher};
use aes::{Aes256, Block};
use ctr::Ctr32BE;
use ghash::{universal_hash::UniversalHash, GHash};
use subtle::ConstantTimeEq;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use secure_gate::RevealSecret;

use crate::aliases::{DerivedKey32, Password};
use crate::consts::{IV_LEN, STREAM_CHUNK_SIZE, TAG_LEN};
use crate::crypto::{check_password_strength, EncryptOptions};
use crate::error::{CoreError, Result};
use crate::file_ops::{
    build_metadata, ensure_parent_dir, require_regular_file, DecryptedFile, EncryptionMetadata,
};
use crate::kdf::derive_key;
use crate::rng::random_array;

const BLOCK_LEN: usize = 16;

/// Progress callback: `(bytes_processed, total_bytes)`, invoked
/// synchronously on the calling thread once per chunk.
pub type ProgressFn<'a> = dyn FnMut(u64, u64) + 'a;

/// Incremental AES-256-GCM.
///
/// Invariant: every chunk fed in must be a multiple of 16 bytes except
/// the final one — GHASH zero-pads per call, which only coincides with
/// GCM's padding at the end of the stream.
struct GcmStream {
    keystream: Ctr32BE<Aes256>,
    ghash: GHash,
    tag_mask: [u8; TAG_LEN],
    cipher_len: u64,
}

impl GcmStream {
    fn new(key: &DerivedKey32, iv: &[u8; IV_LEN]) -> Self {
        let aes = Aes256::new(key.expose_secret().into());
        let mut hash_key = Block::default();
        aes.encrypt_block(&mut hash_key);
        let ghash = GHash::new(&hash_key);

        // J0 = IV || 0^31 || 1. The first keystream block is the tag
        // mask; the counter then sits at inc32(J0) where ciphertext
        // begins.
        let mut j0 = [0u8; BLOCK_LEN];
        j0[..IV_LEN].copy_from_slice(iv);
        j0[BLOCK_LEN - 1] = 1;
        let mut keystream = Ctr32BE::<Aes256>::new(key.expose_secret().into(), &j0.into());
        let mut tag_mask = [0u8; TAG_LEN];
        keystream.apply_keystream(&mut tag_mask);

        Self {
            keystream,
            ghash,
            tag_mask,
            cipher_len: 0,
        }
    }

    /// Encrypt one chunk in place.
    fn encrypt_chunk(&mut self, chunk: &mut [u8]) {
        self.keystream.apply_keystream(chunk);
        self.ghash.update_padded(chunk);
        self.cipher_len += chunk.len() as u64;
    }

    /// Decrypt one chunk in place. GHASH runs over the ciphertext, so it
    /// is fed before the keystream is applied.
    fn decrypt_chunk(&mut self, chunk: &mut [u8]) {
        self.ghash.update_padded(chunk);
        self.keystream.apply_keystream(chunk);
        self.cipher_len += chunk.len() as u64;
    }

    fn finalize(mut self) -> [u8; TAG_LEN] {
        // no AAD in this format, so the length block is 64 zero bits
        // followed by the ciphertext bit length
        let mut len_block = [0u8; BLOCK_LEN];
        len_block[8..].copy_from_slice(&(self.cipher_len * 8).to_be_bytes());
        self.ghash.update(&[len_block.into()]);

        let digest = self.ghash.finalize();
        let mut tag = [0u8; TAG_LEN];
        for i in 0..TAG_LEN {
            tag[i] = digest[i] ^ self.tag_mask[i];
        }
        tag
    }
}

/// Encrypt a file through the bounded-memory pipeline.
///
/// Memory use stays at one chunk regardless of input size; the blocking
/// write naturally backpressures the read loop. A partial output file is
/// deleted if any step fails.
pub fn encrypt_file_stream<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    password: &Password,
    opts: &EncryptOptions,
    progress: Option<&mut ProgressFn<'_>>,
) -> Result<EncryptionMetadata> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    require_regular_file(input_path)?;
    check_password_strength(password)?;

    let result = encrypt_stream_inner(input_path, output_path, password, opts, progress);
    if result.is_err() {
        warn!(path = %output_path.display(), "removing partial output after failed stream encryption");
        let _ = fs::remove_file(output_path);
    }
    result
}

fn encrypt_stream_inner(
    input_path: &Path,
    output_path: &Path,
    password: &Password,
    opts: &EncryptOptions,
    mut progress: Option<&mut ProgressFn<'_>>,
) -> Result<EncryptionMetadata> {
    let total_bytes = fs::metadata(input_path)?.len();
    let iv = match opts.iv {
        Some(iv) => iv,
        None => random_array()?,
    };
    let derived = derive_key(password, opts.salt)?;
    let mut gcm = GcmStream::new(&derived.key, &iv);

    ensure_parent_dir(output_path)?;
    let mut reader = BufReader::new(File::open(input_path)?);
    let mut writer = BufWriter::new(File::create(output_path)?);

    let mut chunk = vec![0u8; STREAM_CHUNK_SIZE];
    let mut processed: u64 = 0;
    loop {
        let n = read_full(&mut reader, &mut chunk)?;
        if n == 0 {
            break;
        }
        gcm.encrypt_chunk(&mut chunk[..n]);
        writer.write_all(&chunk[..n])?;
        processed += n as u64;
        if let Some(callback) = progress.as_deref_mut() {
            callback(processed, total_bytes);
        }
        if n < STREAM_CHUNK_SIZE {
            break;
        }
    }
    writer.flush()?;
    let auth_tag = gcm.finalize();

    debug!(
        input = %input_path.display(),
        output = %output_path.display(),
        size = total_bytes,
        "stream-encrypted file"
    );

    Ok(build_metadata(
        input_path,
        total_bytes,
        &derived.salt,
        &iv,
        &auth_tag,
    ))
}

/// Decrypt a file through the bounded-memory pipeline.
///
/// Plaintext streams into a temporary file beside the destination; only
/// after the tag verifies (constant-time compare against the metadata
/// tag) is it atomically renamed to `output_path`. On mismatch the
/// temporary file is deleted and [`CoreError::IntegrityCheckFailed`] is
/// raised. The progress callback still fires per chunk before
/// verification completes — callers must not treat progress as proof of
/// integrity.
pub fn decrypt_file_stream<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    metadata: &EncryptionMetadata,
    password: &Password,
    mut progress: Option<&mut ProgressFn<'_>>,
) -> Result<DecryptedFile> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    require_regular_file(input_path)?;
    if password.expose_secret().is_empty() {
        return Err(CoreError::EmptyPassword);
    }
    let (salt, iv, expected_tag) = metadata.decode()?;

    let total_bytes = fs::metadata(input_path)?.len();
    let derived = derive_key(password, Some(salt))?;
    let mut gcm = GcmStream::new(&derived.key, &iv);

    ensure_parent_dir(output_path)?;
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    let mut reader = BufReader::new(File::open(input_path)?);

    let mut processed: u64 = 0;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let mut chunk = vec![0u8; STREAM_CHUNK_SIZE];
        loop {
            let n = read_full(&mut reader, &mut chunk)?;
            if n == 0 {
                break;
            }
            gcm.decrypt_chunk(&mut chunk[..n]);
            writer.write_all(&chunk[..n])?;
            processed += n as u64;
            if let Some(callback) = progress.as_deref_mut() {
                callback(processed, total_bytes);
            }
            if n < STREAM_CHUNK_SIZE {
                break;
            }
        }
        writer.flush()?;
    }

    let actual_tag = gcm.finalize();
    if !bool::from(actual_tag[..].ct_eq(&expected_tag[..])) {
        warn!(
            output = %output_path.display(),
            "authentication tag mismatch, discarding streamed plaintext"
        );
        return Err(CoreError::IntegrityCheckFailed);
    }

    tmp.persist(output_path)
        .map_err(|persist_err| CoreError::File(persist_err.error))?;
    debug!(
        input = %input_path.display(),
        output = %output_path.display(),
        size = processed,
        "stream-decrypted file"
    );

    Ok(DecryptedFile {
        output_path: output_path.to_path_buf(),
        original_file_name: metadata.original_file_name.clone(),
        mime_type: metadata.mime_type.clone(),
        size: processed,
        verified: true,
    })
}

/// Read until `buf` is full or EOF; a short count only ever means EOF.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
