//! CipherKeep external crypto engine.
//!
//! Usage:
//!   cipherkeep-engine simple-encrypt '{"password":"..","message":".."}'
//!   cipherkeep-engine simple-decrypt '{"password":"..","ciphertext":".."}'
//!
//! The result is the only thing written to stdout. A refused request prints
//! `ERROR: <reason>` there instead and exits with status 1. Diagnostics go to
//! stderr.

use std::process::ExitCode;

use cipherkeep_engine::{env_keys, KdfParams, NativeEngine};
use cipherkeep_types::{CryptoMode, CryptoRequest, EngineOutcome};
use clap::Parser;
use serde::Deserialize;
use tracing::{debug, error};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "cipherkeep-engine")]
#[command(about = "Encrypts or decrypts one message and prints the result")]
struct Args {
    /// simple-encrypt or simple-decrypt
    mode: String,

    /// JSON argument bundle
    args: String,
}

#[derive(Deserialize)]
struct Bundle {
    password: Option<String>,
    message: Option<String>,
    plaintext: Option<String>,
    ciphertext: Option<String>,
}

fn main() -> ExitCode {
    FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return refuse("Usage: cipherkeep-engine <mode> <json-string>");
        }
    };

    let mode: CryptoMode = match args.mode.parse() {
        Ok(mode) => mode,
        Err(_) => return refuse("Unknown mode"),
    };
    let bundle: Bundle = match serde_json::from_str(&args.args) {
        Ok(bundle) => bundle,
        Err(_) => return refuse("Invalid JSON input"),
    };

    let Some(password) = bundle.password.filter(|p| !p.is_empty()) else {
        return refuse("Missing password");
    };
    let payload = match mode {
        CryptoMode::Encrypt => bundle.message.or(bundle.plaintext),
        CryptoMode::Decrypt => bundle.ciphertext,
    };
    let Some(payload) = payload.filter(|p| !p.is_empty()) else {
        return refuse(match mode {
            CryptoMode::Encrypt => "Message is empty",
            CryptoMode::Decrypt => "Missing ciphertext",
        });
    };

    let request = match CryptoRequest::new(mode, password, payload) {
        Ok(request) => request,
        Err(e) => return refuse(&e.to_string()),
    };

    let engine = NativeEngine::new(kdf_params_from_env());
    debug!(%mode, params = ?engine.params(), "running engine");
    match engine.run_blocking(&request) {
        Ok(EngineOutcome::Success(text)) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Ok(EngineOutcome::Failure(reason)) => refuse(&reason),
        Err(e) => {
            error!("engine failure: {e}");
            ExitCode::from(2)
        }
    }
}

fn refuse(reason: &str) -> ExitCode {
    println!("{}", EngineOutcome::Failure(reason.to_string()).to_wire());
    ExitCode::FAILURE
}

fn kdf_params_from_env() -> KdfParams {
    let mut params = KdfParams::default();
    if let Some(memory) = read_u32(env_keys::KDF_MEMORY_KIB) {
        params.memory_cost = memory;
    }
    if let Some(time) = read_u32(env_keys::KDF_TIME_COST) {
        params.time_cost = time;
    }
    params
}

fn read_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok()?.trim().parse().ok()
}
