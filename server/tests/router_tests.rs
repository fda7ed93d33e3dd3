use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cipherkeep_engine::{
    CryptoEngine, EngineConfig, EngineResult, KdfParams, NativeEngine, SubprocessEngine,
};
use cipherkeep_server::{build_router, AppState, HealthResponse};
use cipherkeep_store::CipherStore;
use cipherkeep_types::{CipherRecord, CryptoRequest, EngineOutcome};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Engine double that counts calls and answers with a fixed outcome.
struct ScriptedEngine {
    calls: AtomicUsize,
    outcome: EngineOutcome,
}

impl ScriptedEngine {
    fn new(outcome: EngineOutcome) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CryptoEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn run(&self, _request: &CryptoRequest) -> EngineResult<EngineOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

struct TestServer {
    base: String,
    store: CipherStore,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestServer {
    async fn post(&self, path: &str, body: Value) -> (u16, String) {
        let resp = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.text().await.unwrap())
    }

    async fn post_raw(&self, path: &str, body: &'static str) -> u16 {
        self.client
            .post(format!("{}{}", self.base, path))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap()
            .status()
            .as_u16()
    }
}

/// Spin up the HTTP server on an OS-assigned port with a scratch store.
async fn spawn_test_server(engine: Arc<dyn CryptoEngine>) -> TestServer {
    let dir = TempDir::new().unwrap();
    let store = CipherStore::new(dir.path().join("user-keys.json"));
    let app = build_router(AppState::new(store.clone(), engine));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        store,
        client: reqwest::Client::new(),
        _dir: dir,
    }
}

fn native() -> Arc<dyn CryptoEngine> {
    Arc::new(NativeEngine::new(KdfParams {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    }))
}

// ── /crypto ───────────────────────────────────────────────────────

#[tokio::test]
async fn crypto_roundtrip_through_native_engine() {
    let server = spawn_test_server(native()).await;
    let (status, cipher) = server
        .post("/crypto", json!({"mode": "simple-encrypt", "password": "pw", "message": "hello"}))
        .await;
    assert_eq!(status, 200);
    assert!(!cipher.is_empty());

    let (status, plain) = server
        .post("/crypto", json!({"mode": "simple-decrypt", "password": "pw", "ciphertext": cipher}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(plain, "hello");
}

#[tokio::test]
async fn crypto_accepts_short_mode_and_plaintext_alias() {
    let engine = ScriptedEngine::new(EngineOutcome::Success("abcd".into()));
    let server = spawn_test_server(engine.clone()).await;
    let (status, body) = server
        .post("/crypto", json!({"mode": "encrypt", "password": "pw", "plaintext": "hi"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, "abcd");
    assert_eq!(engine.calls(), 1);
}

#[tokio::test]
async fn wrong_password_returns_marker_with_200() {
    let server = spawn_test_server(native()).await;
    let (_, cipher) = server
        .post("/crypto", json!({"mode": "simple-encrypt", "password": "right", "message": "hello"}))
        .await;
    let (status, body) = server
        .post("/crypto", json!({"mode": "simple-decrypt", "password": "wrong", "ciphertext": cipher}))
        .await;
    assert_eq!(status, 200);
    assert!(body.starts_with("ERROR:"), "got {body}");
    assert!(!body.contains("hello"));
}

#[tokio::test]
async fn missing_password_is_400_without_engine_call() {
    let engine = ScriptedEngine::new(EngineOutcome::Success("x".into()));
    let server = spawn_test_server(engine.clone()).await;
    let (status, body) = server
        .post("/crypto", json!({"mode": "simple-encrypt", "message": "hello"}))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body, "Missing required fields");
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn mode_specific_payload_is_required() {
    let engine = ScriptedEngine::new(EngineOutcome::Success("x".into()));
    let server = spawn_test_server(engine.clone()).await;

    // decrypt with a message but no ciphertext
    let (status, _) = server
        .post("/crypto", json!({"mode": "simple-decrypt", "password": "pw", "message": "hello"}))
        .await;
    assert_eq!(status, 400);

    // encrypt with an empty message
    let (status, _) = server
        .post("/crypto", json!({"mode": "simple-encrypt", "password": "pw", "message": ""}))
        .await;
    assert_eq!(status, 400);

    // missing and unknown mode
    let (status, _) = server.post("/crypto", json!({"password": "pw", "message": "m"})).await;
    assert_eq!(status, 400);
    let (status, _) = server
        .post("/crypto", json!({"mode": "rot13", "password": "pw", "message": "m"}))
        .await;
    assert_eq!(status, 400);

    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let server = spawn_test_server(native()).await;
    assert_eq!(server.post_raw("/crypto", "{not json").await, 400);
    assert_eq!(server.post_raw("/save", "[]").await, 400);
    assert_eq!(server.post_raw("/delete", "{\"label\":").await, 400);
}

#[tokio::test]
async fn missing_engine_is_500_with_generic_body() {
    let engine = Arc::new(SubprocessEngine::new(EngineConfig::new(
        "/no/such/dir/cipherkeep-engine",
    )));
    let server = spawn_test_server(engine).await;
    let (status, body) = server
        .post("/crypto", json!({"mode": "simple-encrypt", "password": "pw", "message": "m"}))
        .await;
    assert_eq!(status, 500);
    assert!(!body.contains("/no/such/dir"));
}

#[cfg(unix)]
#[tokio::test]
async fn external_engine_text_is_relayed_byte_for_byte() {
    use std::os::unix::fs::PermissionsExt;

    let scripts = TempDir::new().unwrap();
    let path = scripts.path().join("engine.sh");
    std::fs::write(&path, "#!/bin/sh\necho 'ERROR:MAC check failed'\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    // Run through `sh` so the fresh script is never exec'd directly.
    let engine = Arc::new(SubprocessEngine::new(
        EngineConfig::new("sh").with_leading_arg(path.to_string_lossy()),
    ));
    let server = spawn_test_server(engine).await;

    let (status, body) = server
        .post("/crypto", json!({"mode": "simple-decrypt", "password": "pw", "ciphertext": "ab"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, "ERROR:MAC check failed");
}

// ── /save ─────────────────────────────────────────────────────────

#[tokio::test]
async fn save_on_empty_store() {
    let server = spawn_test_server(native()).await;
    let (status, body) = server.post("/save", json!({"label": "work", "cipher": "AB=="})).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Saved successfully.");
    assert_eq!(
        server.store.load().unwrap(),
        vec![CipherRecord::new("work", "AB==").unwrap()]
    );
}

#[tokio::test]
async fn duplicate_save_is_409_and_store_unchanged() {
    let server = spawn_test_server(native()).await;
    server.post("/save", json!({"label": "work", "cipher": "AB=="})).await;
    let (status, body) = server.post("/save", json!({"label": "work", "cipher": "CD=="})).await;
    assert_eq!(status, 409);
    assert_eq!(body, "Label already exists.");
    assert_eq!(
        server.store.load().unwrap(),
        vec![CipherRecord::new("work", "AB==").unwrap()]
    );
}

#[tokio::test]
async fn save_requires_both_fields() {
    let server = spawn_test_server(native()).await;
    let (status, body) = server.post("/save", json!({"label": "work"})).await;
    assert_eq!(status, 400);
    assert_eq!(body, "Missing label or cipher.");
    let (status, _) = server.post("/save", json!({"label": "", "cipher": "AB=="})).await;
    assert_eq!(status, 400);
    assert!(!server.store.exists());
}

#[tokio::test]
async fn saved_cipher_matches_encrypt_result() {
    let server = spawn_test_server(native()).await;
    let (_, cipher) = server
        .post("/crypto", json!({"mode": "simple-encrypt", "password": "pw", "message": "note"}))
        .await;
    server.post("/save", json!({"label": "note", "cipher": cipher})).await;
    assert_eq!(server.store.load().unwrap()[0].cipher, cipher);
}

#[tokio::test]
async fn corrupt_store_is_500() {
    let server = spawn_test_server(native()).await;
    std::fs::write(server.store.path(), "not json").unwrap();
    let (status, body) = server.post("/save", json!({"label": "a", "cipher": "b"})).await;
    assert_eq!(status, 500);
    assert_eq!(body, "Server error.");
}

// ── /delete ───────────────────────────────────────────────────────

#[tokio::test]
async fn delete_on_absent_store_is_404() {
    let server = spawn_test_server(native()).await;
    let (status, body) = server.post("/delete", json!({"label": "work"})).await;
    assert_eq!(status, 404);
    assert_eq!(body, "Data file not found.");
}

#[tokio::test]
async fn delete_unknown_label_is_404_and_store_unchanged() {
    let server = spawn_test_server(native()).await;
    server.post("/save", json!({"label": "work", "cipher": "AB=="})).await;
    let (status, body) = server.post("/delete", json!({"label": "missing"})).await;
    assert_eq!(status, 404);
    assert_eq!(body, "Label not found.");
    assert_eq!(server.store.load().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_removes_exactly_that_label() {
    let server = spawn_test_server(native()).await;
    server.post("/save", json!({"label": "a", "cipher": "1"})).await;
    server.post("/save", json!({"label": "b", "cipher": "2"})).await;
    let (status, body) = server.post("/delete", json!({"label": "a"})).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Deleted successfully.");
    assert_eq!(
        server.store.load().unwrap(),
        vec![CipherRecord::new("b", "2").unwrap()]
    );
}

#[tokio::test]
async fn delete_rejects_non_string_label() {
    let server = spawn_test_server(native()).await;
    for body in [json!({"label": 42}), json!({}), json!({"label": ""}), json!({"label": null})] {
        let (status, text) = server.post("/delete", body).await;
        assert_eq!(status, 400);
        assert_eq!(text, "Missing or invalid label.");
    }
}

// ── read-only endpoints ───────────────────────────────────────────

#[tokio::test]
async fn records_endpoint_lists_store() {
    let server = spawn_test_server(native()).await;
    let empty: Vec<CipherRecord> = reqwest::get(format!("{}/records", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(empty.is_empty());

    server.post("/save", json!({"label": "work", "cipher": "AB=="})).await;
    let resp = reqwest::get(format!("{}/data/user-keys.json", server.base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([{"label": "work", "cipher": "AB=="}]));
}

#[tokio::test]
async fn health_endpoint() {
    let server = spawn_test_server(native()).await;
    let body: HealthResponse = reqwest::get(format!("{}/health", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let server = spawn_test_server(native()).await;
    let resp = reqwest::get(format!("{}/api/v1/nonexistent", server.base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
