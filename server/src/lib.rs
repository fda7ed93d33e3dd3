//! HTTP API for CipherKeep.
//!
//! Routes:
//! - `POST /crypto`   encrypt or decrypt through the configured engine
//! - `POST /save`     store a ciphertext under a new label
//! - `POST /delete`   remove a stored ciphertext by label
//! - `GET  /records`  current store contents as JSON
//! - `GET  /health`   liveness probe
//!
//! No authentication is performed; the server is meant for a single local
//! user.

mod config;
mod error;

pub use config::ServerConfig;
pub use error::ApiError;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use cipherkeep_engine::{CryptoEngine, NativeEngine, SubprocessEngine};
use cipherkeep_store::{CipherStore, StoreResult};
use cipherkeep_types::{CipherRecord, CryptoMode, CryptoRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared handler state. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    store: Arc<CipherStore>,
    engine: Arc<dyn CryptoEngine>,
}

impl AppState {
    pub fn new(store: CipherStore, engine: Arc<dyn CryptoEngine>) -> Self {
        Self {
            store: Arc::new(store),
            engine,
        }
    }

    /// Builds state from configuration. The external engine, if any, is
    /// located here, once.
    pub fn from_config(config: &ServerConfig) -> Self {
        let engine: Arc<dyn CryptoEngine> = match &config.engine {
            Some(engine) => Arc::new(SubprocessEngine::new(engine.clone())),
            None => Arc::new(NativeEngine::default()),
        };
        Self::new(CipherStore::new(&config.store_path), engine)
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }
}

/// `POST /crypto` body. `plaintext` is accepted as an alias of `message`.
#[derive(Debug, Default, Deserialize)]
pub struct CryptoBody {
    pub mode: Option<String>,
    pub password: Option<String>,
    pub message: Option<String>,
    pub plaintext: Option<String>,
    pub ciphertext: Option<String>,
}

impl CryptoBody {
    /// Validates the body into an engine request. Empty strings count as
    /// missing.
    pub fn into_request(self) -> Result<CryptoRequest, ApiError> {
        const MISSING: ApiError = ApiError::Validation("Missing required fields");

        let mode: CryptoMode = present(self.mode)
            .and_then(|m| m.parse().ok())
            .ok_or(MISSING)?;
        let password = present(self.password).ok_or(MISSING)?;
        let payload = match mode {
            CryptoMode::Encrypt => present(self.message).or_else(|| present(self.plaintext)),
            CryptoMode::Decrypt => present(self.ciphertext),
        }
        .ok_or(MISSING)?;

        CryptoRequest::new(mode, password, payload).map_err(|_| MISSING)
    }
}

/// `POST /save` body.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SaveBody {
    pub label: Option<String>,
    pub cipher: Option<String>,
}

/// `POST /delete` body. The label is kept untyped so a non-string value is
/// reported as a validation error rather than a parse failure.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeleteBody {
    pub label: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn crypto_handler(
    State(state): State<AppState>,
    body: Result<Json<CryptoBody>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(body) = body.map_err(|_| ApiError::Validation("Missing required fields"))?;
    let request = body.into_request()?;

    debug!(mode = %request.mode(), engine = state.engine.name(), "crypto request");
    // Engine text goes back as-is, failure marker included.
    Ok(state.engine.run_text(&request).await?)
}

async fn save_handler(
    State(state): State<AppState>,
    body: Result<Json<SaveBody>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    const MISSING: ApiError = ApiError::Validation("Missing label or cipher.");

    let Json(body) = body.map_err(|_| MISSING)?;
    let (Some(label), Some(cipher)) = (present(body.label), present(body.cipher)) else {
        return Err(MISSING);
    };
    let record = CipherRecord::new(label, cipher).map_err(|_| MISSING)?;
    let label = record.label.clone();

    with_store(&state, move |store| store.append(record)).await?;
    info!(%label, "saved record");
    Ok("Saved successfully.")
}

async fn delete_handler(
    State(state): State<AppState>,
    body: Result<Json<DeleteBody>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    const INVALID: ApiError = ApiError::Validation("Missing or invalid label.");

    let Json(body) = body.map_err(|_| INVALID)?;
    let label = match body.label {
        Some(serde_json::Value::String(label)) if !label.is_empty() => label,
        _ => return Err(INVALID),
    };

    let target = label.clone();
    with_store(&state, move |store| store.remove(&target)).await?;
    info!(%label, "deleted record");
    Ok("Deleted successfully.")
}

async fn records_handler(State(state): State<AppState>) -> Result<Json<Vec<CipherRecord>>, ApiError> {
    let records = with_store(&state, |store| store.load()).await?;
    Ok(Json(records))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Runs a store operation on the blocking pool.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&CipherStore) -> StoreResult<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ApiError::server(format!("store task failed: {e}")))?;
    Ok(result?)
}

/// Build the HTTP API router with the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/crypto", post(crypto_handler))
        .route("/save", post(save_handler))
        .route("/delete", post(delete_handler))
        .route("/records", get(records_handler))
        .route("/data/user-keys.json", get(records_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
