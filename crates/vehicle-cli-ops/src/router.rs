use crate::classifier::{classify, ClassificationPolicy, SuccessRule};
use crate::{
    ExecutionResult, GatewayProfile, Operation, ProcessInvoker, SessionAuthenticator,
    StatelessMetric, StatelessStatus, VehicleOpsError,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Name of the session backend's vehicle listing command.
pub const LIST_OPERATION: &str = "list";

/// The two vehicle-control tools behind the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Multi-command tool that needs `login` before every privileged call.
    SessionBased,
    /// Single-purpose tool with no login step.
    Stateless,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionBased => "session",
            Self::Stateless => "stateless",
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, Self::SessionBased)
    }
}

/// Everything decided about a request before any process is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationPlan {
    pub argv: Vec<String>,
    pub requires_session: bool,
    pub policy: ClassificationPolicy,
}

/// Validates operations, authenticates, invokes, and classifies.
#[derive(Clone)]
pub struct CommandRouter {
    profile: Arc<GatewayProfile>,
    invoker: Arc<dyn ProcessInvoker>,
    authenticator: SessionAuthenticator,
}

impl CommandRouter {
    pub fn new(profile: GatewayProfile, invoker: Arc<dyn ProcessInvoker>) -> Self {
        let authenticator = SessionAuthenticator::new(&profile.session_program, invoker.clone());
        Self {
            profile: Arc::new(profile),
            invoker,
            authenticator,
        }
    }

    pub fn profile(&self) -> &GatewayProfile {
        &self.profile
    }

    /// Resolve argv, login requirement, and classification policy for
    /// `operation` without running anything.
    pub fn plan(
        &self,
        operation: &Operation,
        backend: Backend,
    ) -> Result<InvocationPlan, VehicleOpsError> {
        match backend {
            Backend::SessionBased => self.plan_session(operation),
            Backend::Stateless => self.plan_stateless(operation),
        }
    }

    fn plan_session(&self, operation: &Operation) -> Result<InvocationPlan, VehicleOpsError> {
        let name = operation.name();
        let mut argv = vec![self.profile.session_program.clone(), name.to_string()];

        if name == LIST_OPERATION && operation.target().is_none() {
            return Ok(InvocationPlan {
                argv,
                requires_session: Backend::SessionBased.requires_session(),
                policy: ClassificationPolicy::with_block_detection(SuccessRule::ExitOnly),
            });
        }

        let allow_list = &self.profile.allow_list;
        if !allow_list.contains(name) {
            return Err(VehicleOpsError::InvalidOperation {
                operation: name.to_string(),
            });
        }

        let target = operation
            .target()
            .filter(|target| !target.trim().is_empty())
            .ok_or_else(|| VehicleOpsError::MissingTarget {
                operation: name.to_string(),
            })?;
        argv.push(target.to_string());
        argv.extend(operation.parameters().iter().cloned());

        let rule = if allow_list.is_read_only(name) {
            SuccessRule::ExitOnly
        } else {
            SuccessRule::MarkerBased
        };

        Ok(InvocationPlan {
            argv,
            requires_session: Backend::SessionBased.requires_session(),
            policy: ClassificationPolicy::with_block_detection(rule),
        })
    }

    fn plan_stateless(&self, operation: &Operation) -> Result<InvocationPlan, VehicleOpsError> {
        if operation.name().trim().is_empty() {
            return Err(VehicleOpsError::InvalidOperation {
                operation: operation.name().to_string(),
            });
        }

        let mut argv = vec![
            self.profile.stateless_program.clone(),
            operation.name().to_string(),
        ];
        argv.extend(operation.parameters().iter().cloned());

        Ok(InvocationPlan {
            argv,
            requires_session: Backend::Stateless.requires_session(),
            policy: ClassificationPolicy::EXIT_ONLY,
        })
    }

    /// Run one operation end to end.
    ///
    /// `Err` means the request ended before an invocation result existed
    /// (rejected operation or failed login); every other outcome, including
    /// process and domain failures, is an `Ok` result.
    pub async fn handle(
        &self,
        operation: &Operation,
        backend: Backend,
    ) -> Result<ExecutionResult, VehicleOpsError> {
        info!(
            backend = backend.as_str(),
            operation = operation.name(),
            target = operation.target().unwrap_or(""),
            "handling operation"
        );

        let plan = self.plan(operation, backend).inspect_err(|err| {
            warn!(
                backend = backend.as_str(),
                operation = operation.name(),
                code = err.code(),
                "operation rejected"
            );
        })?;

        if plan.requires_session {
            self.authenticator.ensure_session().await?;
        }

        let raw = self.invoker.invoke(&plan.argv).await;
        let result = classify(raw, plan.policy);

        if result.is_success() {
            info!(
                backend = backend.as_str(),
                operation = operation.name(),
                domain_status = result.domain_status().as_str(),
                "operation completed"
            );
        } else {
            warn!(
                backend = backend.as_str(),
                operation = operation.name(),
                domain_status = result.domain_status().as_str(),
                failure_kind = ?result.failure_kind(),
                detail = result.error_detail().unwrap_or(""),
                "operation failed"
            );
        }

        Ok(result)
    }

    /// List vehicles known to the session backend.
    pub async fn list_vehicles(&self) -> Result<ExecutionResult, VehicleOpsError> {
        self.handle(&Operation::new(LIST_OPERATION), Backend::SessionBased)
            .await
    }

    pub async fn stateless_metric(&self, metric: StatelessMetric) -> ExecutionResult {
        self.run_stateless(&metric.operation()).await
    }

    /// Read every stateless metric, stopping at the first failure.
    pub async fn stateless_status(&self) -> Result<StatelessStatus, ExecutionResult> {
        let battery = self.required_metric(StatelessMetric::Battery).await?;
        let chargestatus = self.required_metric(StatelessMetric::ChargeStatus).await?;
        let lockstatus = self.required_metric(StatelessMetric::LockStatus).await?;
        let hvac = self.required_metric(StatelessMetric::Hvac).await?;

        Ok(StatelessStatus {
            battery,
            chargestatus,
            lockstatus,
            hvac,
        })
    }

    /// Switch climate control, e.g. `aircon on`.
    pub async fn set_climate(&self, state: &str) -> ExecutionResult {
        self.run_stateless(&Operation::new("aircon").with_parameter(state))
            .await
    }

    /// Run climate control in `mode` for `minutes`, e.g. `acmode heat 15`.
    /// The tool validates the range itself.
    pub async fn set_climate_mode(&self, mode: &str, minutes: i32) -> ExecutionResult {
        self.run_stateless(
            &Operation::new("acmode")
                .with_parameter(mode)
                .with_parameter(minutes),
        )
        .await
    }

    async fn required_metric(&self, metric: StatelessMetric) -> Result<String, ExecutionResult> {
        let result = self.stateless_metric(metric).await;
        if result.is_success() {
            Ok(result.raw_output().to_string())
        } else {
            Err(result)
        }
    }

    async fn run_stateless(&self, operation: &Operation) -> ExecutionResult {
        match self.handle(operation, Backend::Stateless).await {
            Ok(result) => result,
            // Stateless operations here are built internally and never
            // rejected; report one the same way a failed process is.
            Err(err) => ExecutionResult::failed(None, "", err.to_string()),
        }
    }
}
