//! Vehicle Gateway - HTTP front for the vehicle-control command-line tools.

mod app;
mod http;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gateway_config_and_utils::{init_logging, Config, Paths};

/// Vehicle gateway command-line interface.
#[derive(Parser)]
#[command(name = "vehicle-gateway")]
#[command(about = "HTTP gateway that runs vehicle-control CLI tools and classifies their output")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level or filter (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for runtime files (config, logs). Defaults to ~/.vehicle-gateway
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:8990. Overrides the config file.
    #[arg(long, global = true)]
    listen: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway in the foreground
    Start,
    /// Check whether a gateway is answering on the listen address
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let mut config = Config::load(&paths)?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }

    match cli.command {
        Some(Commands::Start) | None => {
            let json_log_path = if config.json_log_file {
                paths.ensure_dirs()?;
                Some(paths.json_log_file())
            } else {
                None
            };
            init_logging(&config.log_level, json_log_path);
            app::run_gateway(config).await?;
        }
        Some(Commands::Status) => {
            app::check_status(&config).await?;
        }
    }

    Ok(())
}
