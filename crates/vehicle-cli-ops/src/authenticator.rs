use crate::{ProcessInvoker, VehicleOpsError};
use std::sync::Arc;
use tracing::{debug, error, info};

const LOGIN_SUBCOMMAND: &str = "login";

/// Logs the session backend in before a privileged command.
///
/// Nothing is cached: every call runs `<program> login` again and relies on
/// the tool's own login being idempotent. Concurrent requests may log in
/// concurrently.
#[derive(Clone)]
pub struct SessionAuthenticator {
    program: String,
    invoker: Arc<dyn ProcessInvoker>,
}

impl SessionAuthenticator {
    pub fn new(program: impl Into<String>, invoker: Arc<dyn ProcessInvoker>) -> Self {
        Self {
            program: program.into(),
            invoker,
        }
    }

    pub async fn ensure_session(&self) -> Result<(), VehicleOpsError> {
        info!(program = %self.program, "logging in to session backend");
        let argv = [self.program.clone(), LOGIN_SUBCOMMAND.to_string()];
        let result = self.invoker.invoke(&argv).await;

        if result.exit_succeeded() {
            info!(program = %self.program, "login succeeded");
            return Ok(());
        }

        let detail = result
            .error_detail()
            .unwrap_or("login command failed")
            .to_string();
        error!(
            program = %self.program,
            exit_code = ?result.exit_code(),
            detail = %detail,
            "login failed"
        );
        debug!(program = %self.program, output = %result.raw_output(), "login output");
        Err(VehicleOpsError::Auth {
            detail,
            output: result.raw_output().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedInvoker;
    use crate::ExecutionResult;

    #[tokio::test]
    async fn successful_login_runs_login_subcommand() {
        let invoker = Arc::new(ScriptedInvoker::new());
        invoker.push(ExecutionResult::completed("Logged in"));
        let auth = SessionAuthenticator::new("bmw", invoker.clone());

        auth.ensure_session().await.unwrap();

        assert_eq!(invoker.calls(), vec![vec!["bmw".to_string(), "login".to_string()]]);
    }

    #[tokio::test]
    async fn failed_login_returns_auth_error_with_output() {
        let invoker = Arc::new(ScriptedInvoker::new());
        invoker.push(ExecutionResult::failed(
            Some(1),
            "bad credentials",
            "Command 'bmw login' returned non-zero exit status 1.",
        ));
        let auth = SessionAuthenticator::new("bmw", invoker.clone());

        let err = auth.ensure_session().await.unwrap_err();

        match err {
            VehicleOpsError::Auth { detail, output } => {
                assert!(detail.contains("non-zero exit status 1"));
                assert_eq!(output, "bad credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn every_call_logs_in_again() {
        let invoker = Arc::new(ScriptedInvoker::new());
        let auth = SessionAuthenticator::new("bmw", invoker.clone());

        auth.ensure_session().await.unwrap();
        auth.ensure_session().await.unwrap();

        assert_eq!(invoker.call_count(), 2);
    }
}
