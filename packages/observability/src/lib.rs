//! # Observability
//!
//! Tracing setup shared by the vehicle gateway crates.
//!
//! Crates are **log producers** only: they use the standard `tracing` macros
//! and never decide where events go. The binary calls
//! [`init_with_config`] once at startup, which installs:
//!
//! - a compact, human-readable layer on stderr
//! - optionally, a JSON-lines layer appended to a file, one object per event
//!
//! Both layers honour `RUST_LOG` and fall back to the configured level.
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "gateway".into(),
//!     default_level: "debug".into(),
//!     ..Default::default()
//! })?;
//! tracing::info!("ready");
//! ```

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, attached to the startup event.
    pub service_name: String,

    /// Default filter (e.g. "info", "vehicle_cli_ops=debug"), used when
    /// `RUST_LOG` is unset or invalid.
    pub default_level: String,

    /// Append JSON-lines events to this file when set.
    pub log_path: Option<PathBuf>,

    /// Emit the compact human-readable layer on stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: true,
        }
    }
}

/// Build the filter used by every layer.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Open `path` for appending, creating parent directories as needed.
///
/// The file is unbuffered: each event reaches it in a single `write` call in
/// append mode, so concurrent gateway processes never interleave partial
/// lines and `tail -f` sees events as they happen.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.
///
/// Fails if the log file cannot be opened or a subscriber is already
/// installed.
pub fn init_with_config(config: LogConfig) -> io::Result<()> {
    let json_layer = match config.log_path.as_deref() {
        Some(path) => {
            let writer = Mutex::new(open_log_file(path)?);
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(env_filter(&config.default_level)),
            )
        }
        None => None,
    };

    let stderr_layer = config.also_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(io::stderr)
            .with_filter(env_filter(&config.default_level))
    });

    tracing_subscriber::registry()
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(io::Error::other)?;

    tracing::info!(
        service = %config.service_name,
        pid = std::process::id(),
        log_path = ?config.log_path,
        "observability initialized"
    );
    Ok(())
}
