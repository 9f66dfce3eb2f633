//! Mapping of command outcomes onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vehicle_cli_ops::{ExecutionResult, VehicleOpsError};

const FALLBACK_FAILURE_DETAIL: &str = "command failed";

/// JSON body for a command that ran.
#[derive(Debug, Serialize)]
pub struct CommandEnvelope<'a> {
    pub status: &'static str,
    pub output: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

/// `{"status":"success","output":...}` with 200, or the failed envelope with 500.
pub fn envelope(result: &ExecutionResult) -> Response {
    if result.is_success() {
        let body = CommandEnvelope {
            status: "success",
            output: result.raw_output(),
            error: None,
        };
        (StatusCode::OK, Json(body)).into_response()
    } else {
        failed(result)
    }
}

/// The tool's output verbatim with 200, or the failed envelope with 500.
pub fn raw_text(result: &ExecutionResult) -> Response {
    if result.is_success() {
        (StatusCode::OK, result.raw_output().to_string()).into_response()
    } else {
        failed(result)
    }
}

/// Blocked results are reported as failed; the detail tells them apart.
fn failed(result: &ExecutionResult) -> Response {
    let body = CommandEnvelope {
        status: "failed",
        output: result.raw_output(),
        error: Some(result.error_detail().unwrap_or(FALLBACK_FAILURE_DETAIL)),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// `{"detail": ...}` body, the shape the dashboard reads for request errors.
pub fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "detail": message.into() })),
    )
        .into_response()
}

/// A request that ended before the vehicle command ran.
#[derive(Debug)]
pub struct ApiError(pub VehicleOpsError);

impl From<VehicleOpsError> for ApiError {
    fn from(err: VehicleOpsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            VehicleOpsError::Auth { output, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "detail": self.0.to_string(),
                    "output": output,
                })),
            )
                .into_response(),
            err if err.is_client_error() => detail(StatusCode::BAD_REQUEST, err.to_string()),
            err => detail(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        }
    }
}
