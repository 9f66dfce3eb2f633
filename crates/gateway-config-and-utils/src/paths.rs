//! File system paths for the gateway.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

const BASE_DIR_NAME: &str = ".vehicle-gateway";
const JSON_LOG_FILE_NAME: &str = "gateway.jsonl";

/// Locations of the gateway's runtime files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for runtime files (~/.vehicle-gateway)
    base_dir: PathBuf,
}

impl Paths {
    /// Use `~/.vehicle-gateway`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the config file path (~/.vehicle-gateway/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the logs directory (~/.vehicle-gateway/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the JSON-lines log path (~/.vehicle-gateway/logs/gateway.jsonl).
    pub fn json_log_file(&self) -> PathBuf {
        self.logs_dir().join(JSON_LOG_FILE_NAME)
    }

    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
