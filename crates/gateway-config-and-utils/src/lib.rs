//! Configuration, paths, and logging setup for the vehicle gateway.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_LISTEN_ADDR, DEFAULT_LOG_LEVEL};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
