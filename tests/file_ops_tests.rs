// tests/file_ops_tests.rs
mod common;

use std::fs;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::password;
use docvault_crypto::crypto::EncryptOptions;
use docvault_crypto::error::CoreError;
use docvault_crypto::file_ops::{
    decrypt_file, encrypt_file, read_metadata_file, write_metadata_file, EncryptionMetadata,
};
use tempfile::tempdir;

#[test]
fn test_encrypt_decrypt_file_roundtrip() {
    common::setup();
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.txt");
    let encrypted = dir.path().join("report.txt.enc");
    let restored = dir.path().join("restored.txt");
    fs::write(&input, b"quarterly numbers, do not leak").unwrap();

    let metadata = encrypt_file(
        &input,
        &encrypted,
        &password("file-password"),
        &EncryptOptions::default(),
    )
    .unwrap();
    assert_eq!(metadata.original_file_name, "report.txt");
    assert_eq!(metadata.mime_type, "text/plain");
    assert_eq!(metadata.original_size, 30);
    assert_eq!(metadata.version, 1);

    // the ciphertext file must not contain the plaintext
    let stored = fs::read(&encrypted).unwrap();
    assert_eq!(stored.len(), 30);
    assert_ne!(stored.as_slice(), b"quarterly numbers, do not leak");

    let result = decrypt_file(&encrypted, &restored, &metadata, &password("file-password")).unwrap();
    assert!(result.verified);
    assert_eq!(result.size, 30);
    assert_eq!(result.original_file_name, "report.txt");
    assert_eq!(fs::read(&restored).unwrap(), b"quarterly numbers, do not leak");
}

#[test]
fn test_missing_input_is_a_file_error() {
    let dir = tempdir().unwrap();
    let result = encrypt_file(
        dir.path().join("does-not-exist.bin"),
        dir.path().join("out.enc"),
        &password("file-password"),
        &EncryptOptions::default(),
    );
    assert!(matches!(result, Err(CoreError::File(_))));
}

#[test]
fn test_directory_input_is_a_file_error() {
    let dir = tempdir().unwrap();
    let result = encrypt_file(
        dir.path(),
        dir.path().join("out.enc"),
        &password("file-password"),
        &EncryptOptions::default(),
    );
    assert!(matches!(result, Err(CoreError::File(_))));
}

#[test]
fn test_output_directory_is_created() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.bin");
    fs::write(&input, [0xAB; 100]).unwrap();

    let nested = dir.path().join("a").join("b").join("data.enc");
    let metadata = encrypt_file(
        &input,
        &nested,
        &password("file-password"),
        &EncryptOptions::default(),
    )
    .unwrap();
    assert!(nested.is_file());

    let restored = dir.path().join("c").join("data.bin");
    decrypt_file(&nested, &restored, &metadata, &password("file-password")).unwrap();
    assert_eq!(fs::read(&restored).unwrap(), [0xAB; 100]);
}

#[test]
fn test_tampered_metadata_tag_leaves_no_output_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.bin");
    let encrypted = dir.path().join("data.enc");
    let restored = dir.path().join("restored.bin");
    fs::write(&input, b"bytes worth protecting").unwrap();

    let mut metadata = encrypt_file(
        &input,
        &encrypted,
        &password("file-password"),
        &EncryptOptions::default(),
    )
    .unwrap();

    let mut tag = STANDARD.decode(&metadata.auth_tag).unwrap();
    tag[0] ^= 0x01;
    metadata.auth_tag = STANDARD.encode(tag);

    let result = decrypt_file(&encrypted, &restored, &metadata, &password("file-password"));
    assert!(matches!(result, Err(CoreError::WrongPassword)));
    assert!(!restored.exists(), "failed decryption left an output file");
}

#[test]
fn test_wrong_password_leaves_no_output_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.bin");
    let encrypted = dir.path().join("data.enc");
    let restored = dir.path().join("restored.bin");
    fs::write(&input, b"bytes worth protecting").unwrap();

    let metadata = encrypt_file(
        &input,
        &encrypted,
        &password("file-password"),
        &EncryptOptions::default(),
    )
    .unwrap();

    let result = decrypt_file(&encrypted, &restored, &metadata, &password("wrong-password"));
    assert!(matches!(result, Err(CoreError::WrongPassword)));
    assert!(!restored.exists());
}

#[test]
fn test_metadata_version_is_checked_before_crypto() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.bin");
    let encrypted = dir.path().join("data.enc");
    fs::write(&input, b"versioned").unwrap();

    let mut metadata = encrypt_file(
        &input,
        &encrypted,
        &password("file-password"),
        &EncryptOptions::default(),
    )
    .unwrap();
    metadata.version = 7;

    let result = decrypt_file(
        &encrypted,
        dir.path().join("restored.bin"),
        &metadata,
        &password("wrong-password"),
    );
    assert!(matches!(result, Err(CoreError::UnsupportedVersion(7))));
}

#[test]
fn test_mime_fallback_for_unknown_extension() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("blob.weirdext");
    fs::write(&input, [1, 2, 3]).unwrap();

    let metadata = encrypt_file(
        &input,
        dir.path().join("blob.enc"),
        &password("file-password"),
        &EncryptOptions::default(),
    )
    .unwrap();
    assert_eq!(metadata.mime_type, "application/octet-stream");
}

#[test]
fn test_metadata_json_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("photo.png");
    fs::write(&input, [0x89, 0x50, 0x4E, 0x47]).unwrap();

    let metadata = encrypt_file(
        &input,
        dir.path().join("photo.enc"),
        &password("file-password"),
        &EncryptOptions::default(),
    )
    .unwrap();

    let json = metadata.to_json().unwrap();
    assert!(json.contains("\"originalFileName\""));
    assert!(json.contains("\"encryptedAt\""));
    assert!(json.contains("\"mimeType\": \"image/png\""));
    assert_eq!(EncryptionMetadata::from_json(&json).unwrap(), metadata);

    let meta_path = dir.path().join("photo.enc.meta.json");
    write_metadata_file(&meta_path, &metadata).unwrap();
    assert_eq!(read_metadata_file(&meta_path).unwrap(), metadata);
}

#[test]
fn test_metadata_rejects_garbage_json() {
    let result = EncryptionMetadata::from_json("{not json");
    assert!(matches!(result, Err(CoreError::InvalidFormat(_))));
}
