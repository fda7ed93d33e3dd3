//! External-process engine adapter.
//!
//! Each request launches the configured program as
//! `<program> [leading args..] <mode> <json-args>` and waits for it to exit.
//! Standard output is the result; standard error is logged and dropped.
//! There is no pool and no timeout: a stalled engine stalls its request.

use async_trait::async_trait;
use cipherkeep_types::{CryptoMode, CryptoRequest, EngineOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, warn};

use crate::engine::CryptoEngine;
use crate::error::{EngineError, EngineResult};

/// Where the external engine lives and how to launch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Executable path, or a bare name looked up on `PATH`.
    pub program: PathBuf,
    /// Arguments placed before the mode, e.g. an interpreter's script path.
    #[serde(default)]
    pub leading_args: Vec<String>,
    /// Extra environment variables for the engine process.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("cipherkeep-engine"),
            leading_args: Vec::new(),
            env: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_leading_arg(mut self, arg: impl Into<String>) -> Self {
        self.leading_args.push(arg.into());
        self
    }

    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Engine backed by a separate process per request.
///
/// The executable is located once, at construction. Every call re-checks that
/// the located file is still executable and fails with
/// [`EngineError::Unavailable`] before spawning anything if not.
#[derive(Debug, Clone)]
pub struct SubprocessEngine {
    config: EngineConfig,
    resolved: Option<PathBuf>,
}

impl SubprocessEngine {
    pub fn new(config: EngineConfig) -> Self {
        let resolved = resolve_program(&config.program);
        match &resolved {
            Some(path) => debug!(program = %path.display(), "engine executable resolved"),
            None => warn!(
                program = %config.program.display(),
                "engine executable not found; crypto requests will fail"
            ),
        }
        Self { config, resolved }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Path the executable resolved to, if it was found.
    pub fn resolved_program(&self) -> Option<&Path> {
        self.resolved.as_deref()
    }

    /// Runs the engine once and returns its standard output with trailing
    /// whitespace removed. The text is not otherwise inspected.
    pub async fn invoke(&self, mode: CryptoMode, args: &serde_json::Value) -> EngineResult<String> {
        let program = match &self.resolved {
            Some(path) if is_executable(path) => path,
            Some(path) => {
                error!(program = %path.display(), "engine executable is gone or not executable");
                return Err(EngineError::Unavailable {
                    program: path.clone(),
                });
            }
            None => {
                error!(program = %self.config.program.display(), "engine executable not found");
                return Err(EngineError::Unavailable {
                    program: self.config.program.clone(),
                });
            }
        };

        let args_json = serde_json::to_string(args)?;
        let output = Command::new(program)
            .args(&self.config.leading_args)
            .arg(mode.wire_name())
            .arg(args_json)
            .envs(&self.config.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| EngineError::Launch {
                program: program.clone(),
                source,
            })?;

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            if !line.trim().is_empty() {
                warn!(engine = %program.display(), "engine stderr: {}", line);
            }
        }
        if !output.status.success() {
            debug!(status = %output.status, %mode, "engine exited with non-zero status");
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

#[async_trait]
impl CryptoEngine for SubprocessEngine {
    fn name(&self) -> &'static str {
        "subprocess"
    }

    async fn run(&self, request: &CryptoRequest) -> EngineResult<EngineOutcome> {
        let text = self.run_text(request).await?;
        Ok(EngineOutcome::from_wire(&text))
    }

    async fn run_text(&self, request: &CryptoRequest) -> EngineResult<String> {
        self.invoke(request.mode(), &request.engine_args()).await
    }
}

/// Finds `program` on disk. Anything with a directory component is taken as
/// a path; a bare name is searched for on `PATH`.
fn resolve_program(program: &Path) -> Option<PathBuf> {
    if program.as_os_str().is_empty() {
        return None;
    }
    if program.components().count() > 1 || program.is_absolute() {
        return is_executable(program).then(|| program.to_path_buf());
    }

    let search = env::var_os("PATH")?;
    env::split_paths(&search).find_map(|dir| {
        let candidate = dir.join(program);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        if cfg!(windows) {
            let with_ext = candidate.with_extension("exe");
            if is_executable(&with_ext) {
                return Some(with_ext);
            }
        }
        None
    })
}

fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
