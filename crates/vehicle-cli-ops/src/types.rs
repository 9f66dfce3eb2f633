use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A requested vehicle action, built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    name: String,
    target: Option<String>,
    parameters: Vec<String>,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            parameters: Vec::new(),
        }
    }

    /// Operation addressed at one vehicle, e.g. `lock VIN123`.
    pub fn for_vehicle(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name).with_target(target)
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Appends one positional argument. Integers are rendered in decimal.
    pub fn with_parameter(mut self, parameter: impl ToString) -> Self {
        self.parameters.push(parameter.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    Success,
    Failed,
    Blocked,
}

impl DomainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Blocked => "blocked",
        }
    }
}

/// Why a non-successful result failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The tool exited non-zero, was killed, or could not be spawned.
    ProcessFailure,
    /// The tool exited zero but its output reports a failure or a block.
    DomainFailure,
    /// The tool was still running when the configured timeout expired.
    Timeout,
}

/// Outcome of one external invocation.
///
/// `domain_status` starts out derived from the exit status alone and is only
/// refined by the classifier, so `Blocked` can never appear on a result whose
/// process failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    exit_succeeded: bool,
    exit_code: Option<i32>,
    timed_out: bool,
    raw_output: String,
    domain_status: DomainStatus,
    error_detail: Option<String>,
}

impl ExecutionResult {
    /// The process ran to completion with a zero exit status.
    pub fn completed(raw_output: impl Into<String>) -> Self {
        Self {
            exit_succeeded: true,
            exit_code: Some(0),
            timed_out: false,
            raw_output: raw_output.into(),
            domain_status: DomainStatus::Success,
            error_detail: None,
        }
    }

    /// The process failed. `exit_code` is `None` when it was killed by a
    /// signal or never started.
    pub fn failed(
        exit_code: Option<i32>,
        raw_output: impl Into<String>,
        error_detail: impl Into<String>,
    ) -> Self {
        Self {
            exit_succeeded: false,
            exit_code,
            timed_out: false,
            raw_output: raw_output.into(),
            domain_status: DomainStatus::Failed,
            error_detail: Some(error_detail.into()),
        }
    }

    /// The process was killed after `limit`; `raw_output` is what it printed
    /// before that.
    pub fn timed_out(raw_output: impl Into<String>, limit: Duration) -> Self {
        Self {
            timed_out: true,
            ..Self::failed(
                None,
                raw_output,
                format!("command timed out after {limit:?}"),
            )
        }
    }

    pub fn exit_succeeded(&self) -> bool {
        self.exit_succeeded
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn raw_output(&self) -> &str {
        &self.raw_output
    }

    pub fn domain_status(&self) -> DomainStatus {
        self.domain_status
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.domain_status == DomainStatus::Success
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        if self.is_success() {
            None
        } else if self.timed_out {
            Some(FailureKind::Timeout)
        } else if !self.exit_succeeded {
            Some(FailureKind::ProcessFailure)
        } else {
            Some(FailureKind::DomainFailure)
        }
    }

    pub(crate) fn into_status(
        mut self,
        domain_status: DomainStatus,
        error_detail: Option<String>,
    ) -> Self {
        self.domain_status = domain_status;
        self.error_detail = error_detail;
        self
    }
}

/// Read-only metrics exposed by the stateless tool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatelessMetric {
    Battery,
    ChargeStatus,
    LockStatus,
    Hvac,
}

impl StatelessMetric {
    pub const ALL: [StatelessMetric; 4] = [
        Self::Battery,
        Self::ChargeStatus,
        Self::LockStatus,
        Self::Hvac,
    ];

    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::ChargeStatus => "chargestatus",
            Self::LockStatus => "lockstatus",
            Self::Hvac => "hvac",
        }
    }

    pub fn operation(&self) -> Operation {
        Operation::new(self.as_arg())
    }
}

impl fmt::Display for StatelessMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

impl FromStr for StatelessMetric {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_arg() == value)
            .ok_or_else(|| value.to_string())
    }
}

/// Combined reading of every stateless metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatelessStatus {
    pub battery: String,
    pub chargestatus: String,
    pub lockstatus: String,
    pub hvac: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_builder_keeps_parameter_order() {
        let op = Operation::new("acmode").with_parameter("heat").with_parameter(15);
        assert_eq!(op.name(), "acmode");
        assert_eq!(op.target(), None);
        assert_eq!(op.parameters(), ["heat".to_string(), "15".to_string()]);
    }

    #[test]
    fn completed_result_is_success() {
        let result = ExecutionResult::completed("72%");
        assert!(result.exit_succeeded());
        assert!(result.is_success());
        assert_eq!(result.failure_kind(), None);
        assert_eq!(result.error_detail(), None);
    }

    #[test]
    fn failed_result_is_process_failure() {
        let result = ExecutionResult::failed(Some(2), "boom", "exit status: 2");
        assert_eq!(result.domain_status(), DomainStatus::Failed);
        assert_eq!(result.failure_kind(), Some(FailureKind::ProcessFailure));
        assert_eq!(result.exit_code(), Some(2));
    }

    #[test]
    fn timed_out_result_reports_timeout() {
        let result = ExecutionResult::timed_out("partial", Duration::from_secs(5));
        assert_eq!(result.failure_kind(), Some(FailureKind::Timeout));
        assert_eq!(result.error_detail(), Some("command timed out after 5s"));
        assert_eq!(result.raw_output(), "partial");
    }

    #[test]
    fn stateless_metric_parses_tool_names() {
        assert_eq!(
            "chargestatus".parse::<StatelessMetric>(),
            Ok(StatelessMetric::ChargeStatus)
        );
        assert_eq!("hvac".parse::<StatelessMetric>(), Ok(StatelessMetric::Hvac));
        assert!("aircon".parse::<StatelessMetric>().is_err());
    }

    #[test]
    fn stateless_status_serializes_tool_field_names() {
        let status = StatelessStatus {
            battery: "72%".to_string(),
            chargestatus: "charging".to_string(),
            lockstatus: "locked".to_string(),
            hvac: "off".to_string(),
        };
        let value = serde_json::to_value(&status).expect("serialize");
        assert_eq!(value["battery"], "72%");
        assert_eq!(value["hvac"], "off");
    }
}
