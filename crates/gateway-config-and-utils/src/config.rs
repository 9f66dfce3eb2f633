//! Configuration management for the gateway.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use vehicle_cli_ops::{GatewayProfile, DEFAULT_SESSION_PROGRAM, DEFAULT_STATELESS_PROGRAM};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default listen address. Port 8990 is where the dashboard UI expects the API.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8990";

const ENV_LOG_LEVEL: &str = "VEHICLE_GATEWAY_LOG_LEVEL";
const ENV_LISTEN: &str = "VEHICLE_GATEWAY_LISTEN";
const ENV_SESSION_PROGRAM: &str = "VEHICLE_GATEWAY_SESSION_PROGRAM";
const ENV_STATELESS_PROGRAM: &str = "VEHICLE_GATEWAY_STATELESS_PROGRAM";
const ENV_COMMAND_TIMEOUT_SECS: &str = "VEHICLE_GATEWAY_COMMAND_TIMEOUT_SECS";

/// Main gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Address the HTTP API binds to.
    pub listen_addr: String,
    /// Executable of the session-based vehicle tool.
    pub session_program: String,
    /// Executable of the stateless vehicle tool.
    pub stateless_program: String,
    /// Kill a vehicle tool that runs longer than this. Unbounded when unset.
    pub command_timeout_secs: Option<u64>,
    /// Also serve the `/bmw/...` and `/mitsubishi/...` routes the existing
    /// dashboard calls.
    pub legacy_routes: bool,
    /// Append JSON-lines logs under the logs directory.
    pub json_log_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            session_program: DEFAULT_SESSION_PROGRAM.to_string(),
            stateless_program: DEFAULT_STATELESS_PROGRAM.to_string(),
            command_timeout_secs: None,
            legacy_routes: true,
            json_log_file: false,
        }
    }
}

impl Config {
    /// Load configuration from `config.json` under `paths`, falling back to
    /// defaults, then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn load_from_env(&mut self) -> CoreResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Override fields from `lookup`, which maps variable names to values.
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        if let Some(log_level) = value(ENV_LOG_LEVEL) {
            self.log_level = log_level;
        }
        if let Some(listen_addr) = value(ENV_LISTEN) {
            self.listen_addr = listen_addr;
        }
        if let Some(program) = value(ENV_SESSION_PROGRAM) {
            self.session_program = program;
        }
        if let Some(program) = value(ENV_STATELESS_PROGRAM) {
            self.stateless_program = program;
        }
        if let Some(raw) = value(ENV_COMMAND_TIMEOUT_SECS) {
            let secs = raw.parse::<u64>().map_err(|err| {
                CoreError::Config(format!("{ENV_COMMAND_TIMEOUT_SECS}={raw:?}: {err}"))
            })?;
            self.command_timeout_secs = (secs > 0).then_some(secs);
        }
        Ok(())
    }

    /// Get the listen address as a parsed socket address.
    pub fn listen_addr(&self) -> CoreResult<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|source| CoreError::InvalidAddress {
                address: self.listen_addr.clone(),
                source,
            })
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// Program names and allow-list handed to the command router.
    pub fn gateway_profile(&self) -> CoreResult<GatewayProfile> {
        for (field, program) in [
            ("session_program", &self.session_program),
            ("stateless_program", &self.stateless_program),
        ] {
            if program.trim().is_empty() {
                return Err(CoreError::Config(format!("{field} must not be empty")));
            }
        }
        Ok(GatewayProfile::new(
            self.session_program.trim(),
            self.stateless_program.trim(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.session_program, "bmw");
        assert_eq!(config.stateless_program, "phevctl");
        assert_eq!(config.command_timeout(), None);
        assert!(config.legacy_routes);
    }

    #[test]
    fn test_config_load_from_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        let config_json = r#"{
            "log_level": "debug",
            "command_timeout_secs": 45
        }"#;
        std::fs::write(&config_path, config_json).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(45)));
        assert_eq!(config.session_program, "bmw");
    }

    #[test]
    fn test_config_load_reads_file_under_base_dir() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        paths.ensure_dirs().unwrap();
        std::fs::write(
            paths.config_file(),
            r#"{ "stateless_program": "/usr/local/bin/phevctl", "legacy_routes": false }"#,
        )
        .unwrap();

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.stateless_program, "/usr/local/bin/phevctl");
        assert!(!config.legacy_routes);
    }

    #[test]
    fn test_config_load_rejects_malformed_file() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        paths.ensure_dirs().unwrap();
        std::fs::write(paths.config_file(), "{ not json").unwrap();

        assert!(matches!(Config::load(&paths), Err(CoreError::Json(_))));
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.stateless_program, DEFAULT_STATELESS_PROGRAM);
    }

    #[test]
    fn test_overrides_replace_fields() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[
                (ENV_LOG_LEVEL, "trace"),
                (ENV_LISTEN, "0.0.0.0:9000"),
                (ENV_SESSION_PROGRAM, "/opt/bmw"),
                (ENV_COMMAND_TIMEOUT_SECS, "30"),
            ]))
            .unwrap();

        assert_eq!(config.log_level, "trace");
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.session_program, "/opt/bmw");
        assert_eq!(config.command_timeout_secs, Some(30));
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[(ENV_LOG_LEVEL, "  "), (ENV_STATELESS_PROGRAM, "")]))
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_zero_timeout_means_unbounded() {
        let mut config = Config {
            command_timeout_secs: Some(10),
            ..Config::default()
        };
        config
            .apply_overrides(lookup(&[(ENV_COMMAND_TIMEOUT_SECS, "0")]))
            .unwrap();
        assert_eq!(config.command_timeout(), None);
    }

    #[test]
    fn test_invalid_timeout_override_is_an_error() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(lookup(&[(ENV_COMMAND_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_listen_addr_parse() {
        let config = Config::default();
        let addr = config.listen_addr().unwrap();
        assert_eq!(addr.port(), 8990);

        let invalid = Config {
            listen_addr: "localhost".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            invalid.listen_addr(),
            Err(CoreError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_gateway_profile_rejects_empty_program() {
        let config = Config {
            session_program: " ".to_string(),
            ..Config::default()
        };
        assert!(config.gateway_profile().is_err());

        let profile = Config::default().gateway_profile().unwrap();
        assert_eq!(profile.session_program, "bmw");
        assert!(profile.allow_list.contains("honk"));
    }
}
