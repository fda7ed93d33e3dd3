use cipherkeep_types::{CryptoMode, CryptoRequest, EngineOutcome, Error, ERROR_MARKER};
use proptest::prelude::*;
use std::str::FromStr;

// ── CryptoMode ────────────────────────────────────────────────────

#[test]
fn mode_parses_engine_and_short_names() {
    assert_eq!(CryptoMode::from_str("simple-encrypt").unwrap(), CryptoMode::Encrypt);
    assert_eq!(CryptoMode::from_str("encrypt").unwrap(), CryptoMode::Encrypt);
    assert_eq!(CryptoMode::from_str("simple-decrypt").unwrap(), CryptoMode::Decrypt);
    assert_eq!(CryptoMode::from_str("decrypt").unwrap(), CryptoMode::Decrypt);
}

#[test]
fn mode_unknown_is_error() {
    assert!(matches!(CryptoMode::from_str("rot13"), Err(Error::UnknownMode(_))));
}

#[test]
fn mode_wire_names() {
    assert_eq!(CryptoMode::Encrypt.wire_name(), "simple-encrypt");
    assert_eq!(CryptoMode::Decrypt.wire_name(), "simple-decrypt");
}

#[test]
fn mode_serde_uses_wire_names() {
    let json = serde_json::to_string(&CryptoMode::Decrypt).unwrap();
    assert_eq!(json, r#""simple-decrypt""#);
    let parsed: CryptoMode = serde_json::from_str(r#""encrypt""#).unwrap();
    assert_eq!(parsed, CryptoMode::Encrypt);
}

// ── CryptoRequest ─────────────────────────────────────────────────

#[test]
fn request_rejects_empty_password() {
    assert!(matches!(
        CryptoRequest::encrypt("", "hello"),
        Err(Error::EmptyPassword)
    ));
}

#[test]
fn request_rejects_empty_payload() {
    let err = CryptoRequest::decrypt("pw", "").unwrap_err();
    assert!(format!("{err}").contains("ciphertext"));
}

#[test]
fn encrypt_args_carry_message() {
    let req = CryptoRequest::encrypt("pw", "hello").unwrap();
    assert_eq!(
        req.engine_args(),
        serde_json::json!({"password": "pw", "message": "hello"})
    );
}

#[test]
fn decrypt_args_carry_ciphertext() {
    let req = CryptoRequest::decrypt("pw", "abcd").unwrap();
    assert_eq!(
        req.engine_args(),
        serde_json::json!({"password": "pw", "ciphertext": "abcd"})
    );
}

#[test]
fn request_debug_redacts_password() {
    let req = CryptoRequest::encrypt("hunter2", "hello").unwrap();
    let debug = format!("{req:?}");
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("REDACTED"));
}

// ── EngineOutcome ─────────────────────────────────────────────────

#[test]
fn marker_prefixed_text_is_failure() {
    let outcome = EngineOutcome::from_wire("ERROR: MAC check failed");
    assert_eq!(outcome, EngineOutcome::Failure("MAC check failed".into()));
}

#[test]
fn plain_text_is_success() {
    let outcome = EngineOutcome::from_wire("deadbeef");
    assert_eq!(outcome, EngineOutcome::Success("deadbeef".into()));
}

#[test]
fn marker_must_be_a_prefix() {
    let outcome = EngineOutcome::from_wire("note: ERROR: inside");
    assert!(outcome.is_success());
}

#[test]
fn failure_wire_form_starts_with_marker() {
    let wire = EngineOutcome::Failure("bad password".into()).to_wire();
    assert!(wire.starts_with(ERROR_MARKER));
    assert_eq!(wire, "ERROR: bad password");
}

#[test]
fn into_result_splits_variants() {
    assert_eq!(EngineOutcome::Success("x".into()).into_result(), Ok("x".to_string()));
    assert_eq!(
        EngineOutcome::Failure("no".into()).into_result(),
        Err("no".to_string())
    );
}

proptest! {
    #[test]
    fn failure_survives_wire(reason in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,40}[a-zA-Z0-9]") {
        let outcome = EngineOutcome::Failure(reason.clone());
        prop_assert_eq!(EngineOutcome::from_wire(&outcome.to_wire()), outcome);
    }

    #[test]
    fn hex_text_is_never_failure(text in "[0-9a-f]{1,64}") {
        prop_assert!(EngineOutcome::from_wire(&text).is_success());
    }
}
