//! Handlers for the stateless tool.
//!
//! Reads and climate actions answer with the tool's raw text on success,
//! which is what the dashboard renders.

use crate::app::GatewayState;
use crate::http::response::{detail, envelope, raw_text};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;
use vehicle_cli_ops::StatelessMetric;

/// Every metric in one object; the first failing read fails the call.
pub async fn status(State(state): State<GatewayState>) -> Response {
    match state.router.stateless_status().await {
        Ok(status) => Json(status).into_response(),
        Err(result) => envelope(&result),
    }
}

pub async fn metric(State(state): State<GatewayState>, Path(name): Path<String>) -> Response {
    let metric = match name.parse::<StatelessMetric>() {
        Ok(metric) => metric,
        Err(name) => {
            warn!(metric = %name, "unknown stateless metric");
            return detail(StatusCode::BAD_REQUEST, format!("Invalid metric: {name}"));
        }
    };
    raw_text(&state.router.stateless_metric(metric).await)
}

/// Switch climate control to `state`, e.g. `on` or `off`.
pub async fn set_climate(
    State(state): State<GatewayState>,
    Path(climate): Path<String>,
) -> Response {
    raw_text(&state.router.set_climate(&climate).await)
}

pub async fn set_climate_mode(
    State(state): State<GatewayState>,
    Path((mode, minutes)): Path<(String, i32)>,
) -> Response {
    raw_text(&state.router.set_climate_mode(&mode, minutes).await)
}
