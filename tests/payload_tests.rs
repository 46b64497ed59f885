// tests/payload_tests.rs
mod common;

use common::password;
use docvault_crypto::crypto::{encrypt_bytes, EncryptOptions};
use docvault_crypto::error::CoreError;
use docvault_crypto::payload::EncryptedPayload;

fn sample_payload() -> EncryptedPayload {
    encrypt_bytes(
        b"validator fixture",
        &password("fixture-password"),
        &EncryptOptions::default(),
    )
    .unwrap()
}

#[test]
fn test_parse_accepts_real_payload() {
    let payload = sample_payload();
    let raw = payload.parse().unwrap();
    assert_eq!(raw.version, payload.version);
    assert_eq!(raw.salt.len(), 16);
    assert_eq!(raw.iv.len(), 12);
    assert_eq!(raw.auth_tag.len(), 16);
}

#[test]
fn test_validate_is_parse_without_the_value() {
    assert!(sample_payload().validate().is_ok());
}

#[test]
fn test_missing_salt() {
    let mut payload = sample_payload();
    payload.salt = String::new();
    assert!(matches!(
        payload.parse(),
        Err(CoreError::MissingFields("salt"))
    ));
}

#[test]
fn test_missing_iv() {
    let mut payload = sample_payload();
    payload.iv = String::new();
    assert!(matches!(payload.parse(), Err(CoreError::MissingFields("iv"))));
}

#[test]
fn test_missing_auth_tag() {
    let mut payload = sample_payload();
    payload.auth_tag = String::new();
    assert!(matches!(
        payload.parse(),
        Err(CoreError::MissingFields("authTag"))
    ));
}

#[test]
fn test_empty_ciphertext_is_allowed() {
    let mut payload = sample_payload();
    payload.cipher_text = String::new();
    let raw = payload.parse().unwrap();
    assert!(raw.cipher_text.is_empty());
}

#[test]
fn test_malformed_base64_ciphertext() {
    let mut payload = sample_payload();
    payload.cipher_text = "not base64 at all!!!".to_string();
    assert!(matches!(payload.parse(), Err(CoreError::InvalidFormat(_))));
}

#[test]
fn test_malformed_base64_salt() {
    let mut payload = sample_payload();
    payload.salt = "@@@@".to_string();
    assert!(matches!(payload.parse(), Err(CoreError::InvalidFormat(_))));
}

#[test]
fn test_wrong_salt_length() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    let mut payload = sample_payload();
    payload.salt = STANDARD.encode([0u8; 8]);
    assert!(matches!(payload.parse(), Err(CoreError::InvalidFormat(_))));
}

#[test]
fn test_wrong_iv_length() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    let mut payload = sample_payload();
    payload.iv = STANDARD.encode([0u8; 16]);
    assert!(matches!(payload.parse(), Err(CoreError::InvalidFormat(_))));
}

#[test]
fn test_wrong_tag_length() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    let mut payload = sample_payload();
    payload.auth_tag = STANDARD.encode([0u8; 12]);
    assert!(matches!(payload.parse(), Err(CoreError::InvalidFormat(_))));
}

#[test]
fn test_unsupported_versions_are_rejected() {
    for version in [0u32, 2, 99] {
        let mut payload = sample_payload();
        payload.version = version;
        assert!(
            matches!(payload.parse(), Err(CoreError::UnsupportedVersion(v)) if v == version),
            "version {version} was not rejected"
        );
    }
}

#[test]
fn test_serde_roundtrip_uses_wire_names() {
    let payload = sample_payload();
    let json = serde_json::to_string(&payload).unwrap();
    assert!(json.contains("\"cipherText\""));
    assert!(json.contains("\"authTag\""));
    assert!(json.contains("\"version\":1"));

    let back: EncryptedPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(back, payload);
}

#[test]
fn test_raw_encode_roundtrip() {
    let payload = sample_payload();
    let raw = payload.parse().unwrap();
    assert_eq!(raw.encode(), payload);
}
