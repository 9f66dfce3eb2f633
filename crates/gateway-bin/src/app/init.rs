//! Gateway startup and serve loop.

use crate::app::GatewayState;
use crate::http;
use gateway_config_and_utils::Config;
use std::sync::Arc;
use tracing::{info, warn};
use vehicle_cli_ops::TokioProcessInvoker;

/// Bind the listen address and serve until Ctrl-C.
pub async fn run_gateway(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.listen_addr()?;
    let profile = config.gateway_profile()?;

    let invoker = match config.command_timeout() {
        Some(limit) => TokioProcessInvoker::with_timeout(limit),
        None => TokioProcessInvoker::new(),
    };

    let operations: Vec<&str> = profile.allow_list.names().collect();
    info!(
        session_program = %profile.session_program,
        stateless_program = %profile.stateless_program,
        session_operations = ?operations,
        command_timeout = ?invoker.timeout(),
        legacy_routes = config.legacy_routes,
        "starting vehicle gateway"
    );

    let state = GatewayState::new(profile, Arc::new(invoker));
    let app = http::build_router(state, config.legacy_routes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("vehicle gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl-C, shutting down"),
        Err(err) => warn!(error = %err, "failed to listen for Ctrl-C, shutting down"),
    }
}
