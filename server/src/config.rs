//! Server configuration.

use cipherkeep_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Everything the router needs to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub listen: SocketAddr,
    /// Path of the JSON store document.
    pub store_path: PathBuf,
    /// External engine to launch per request. `None` runs the cipher
    /// in-process.
    pub engine: Option<EngineConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            store_path: PathBuf::from("data").join("user-keys.json"),
            engine: None,
        }
    }
}
