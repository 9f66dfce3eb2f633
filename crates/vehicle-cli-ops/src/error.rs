use thiserror::Error;

/// Failures that end a request before or instead of an execution result.
#[derive(Debug, Error)]
pub enum VehicleOpsError {
    #[error("Invalid operation: {operation}")]
    InvalidOperation { operation: String },

    #[error("Operation {operation} requires a vehicle target")]
    MissingTarget { operation: String },

    #[error("Login failed: {detail}")]
    Auth { detail: String, output: String },
}

impl VehicleOpsError {
    /// Stable machine-readable error code for HTTP clients and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidOperation { .. } => "invalid_operation",
            Self::MissingTarget { .. } => "missing_target",
            Self::Auth { .. } => "auth_failed",
        }
    }

    /// Whether the caller sent something the gateway refuses to run.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOperation { .. } | Self::MissingTarget { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let invalid = VehicleOpsError::InvalidOperation {
            operation: "flashlight".to_string(),
        };
        let auth = VehicleOpsError::Auth {
            detail: "exit status: 1".to_string(),
            output: String::new(),
        };
        assert_eq!(invalid.code(), "invalid_operation");
        assert_eq!(auth.code(), "auth_failed");
        assert!(invalid.is_client_error());
        assert!(!auth.is_client_error());
    }

    #[test]
    fn invalid_operation_message_names_operation() {
        let err = VehicleOpsError::InvalidOperation {
            operation: "flashlight".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid operation: flashlight");
    }
}
