//! Handlers for the session-based tool.

use crate::app::GatewayState;
use crate::http::response::{envelope, ApiError};
use axum::extract::{Path, State};
use axum::response::Response;
use vehicle_cli_ops::{Backend, Operation};

/// Run `<operation> <target>`, e.g. `lock VIN123`.
pub async fn run_command(
    State(state): State<GatewayState>,
    Path((operation, target)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let operation = Operation::for_vehicle(operation, target);
    let result = state
        .router
        .handle(&operation, Backend::SessionBased)
        .await?;
    Ok(envelope(&result))
}

pub async fn list_vehicles(State(state): State<GatewayState>) -> Result<Response, ApiError> {
    let result = state.router.list_vehicles().await?;
    Ok(envelope(&result))
}
