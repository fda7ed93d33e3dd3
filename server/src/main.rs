//! CipherKeep server
//!
//! Serves the crypto bridge and the labelled ciphertext store over HTTP for
//! a single local user.
//!
//! Usage:
//!   cipherkeep-server --port 3000 --store data/user-keys.json
//!   cipherkeep-server --engine-program python3 \
//!       --engine-arg server/scripts/crypto.py \
//!       --engine-env PYTHONHOME=.python

use std::{net::IpAddr, net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use cipherkeep_engine::EngineConfig;
use cipherkeep_server::{build_router, AppState, ServerConfig};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "cipherkeep-server")]
#[command(about = "Password encryption bridge and labelled ciphertext store")]
struct Args {
    /// HTTP port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Path of the JSON store document
    #[arg(short, long, default_value = "data/user-keys.json")]
    store: PathBuf,

    /// External engine executable; the built-in cipher is used when omitted
    #[arg(long)]
    engine_program: Option<PathBuf>,

    /// Argument placed before the mode on every engine call (repeatable)
    #[arg(long = "engine-arg", requires = "engine_program")]
    engine_args: Vec<String>,

    /// KEY=VALUE environment variable for the engine process (repeatable)
    #[arg(long = "engine-env", value_parser = parse_key_val, requires = "engine_program")]
    engine_env: Vec<(String, String)>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let engine = self.engine_program.map(|program| EngineConfig {
            program,
            leading_args: self.engine_args,
            env: self.engine_env.into_iter().collect(),
        });
        ServerConfig {
            listen: SocketAddr::new(self.bind, self.port),
            store_path: self.store,
            engine,
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let config = args.into_config();
    info!("CipherKeep server starting...");

    let state = AppState::from_config(&config);
    info!(
        engine = state.engine_name(),
        store = %config.store_path.display(),
        "state initialized"
    );

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until killed.
        std::future::pending::<()>().await;
    }
}
