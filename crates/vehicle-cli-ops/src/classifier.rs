//! Output classification.
//!
//! The vehicle tools report outcomes inconsistently: sometimes through the
//! exit status, sometimes only in their text, sometimes through an embedded
//! HTTP-like status token. A [`ClassificationPolicy`] says which of those
//! signals a given operation is judged by.

use crate::{DomainStatus, ExecutionResult};

const SUCCESS_MARKERS: &[&str] = &["Success", "EXECUTED"];
const BLOCK_MARKERS: &[&str] = &["Blocked", "489"];

pub const BLOCKED_DETAIL: &str =
    "BMW API blocked the request (rate limit reached or region restricted, code 489)";
pub const NO_SUCCESS_MARKER_DETAIL: &str = "command output did not confirm success";

/// How a clean exit is turned into a domain status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessRule {
    /// A zero exit status is enough.
    ExitOnly,
    /// The output must also contain a success marker.
    MarkerBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationPolicy {
    pub rule: SuccessRule,
    /// Check for block markers before applying `rule`.
    pub detect_blocks: bool,
}

impl ClassificationPolicy {
    pub const EXIT_ONLY: Self = Self {
        rule: SuccessRule::ExitOnly,
        detect_blocks: false,
    };

    pub const fn with_block_detection(rule: SuccessRule) -> Self {
        Self {
            rule,
            detect_blocks: true,
        }
    }
}

/// Derive the domain status of `result` under `policy`.
///
/// A failed process stays `Failed` with the invoker's detail; the policy only
/// decides what a clean exit means.
pub fn classify(result: ExecutionResult, policy: ClassificationPolicy) -> ExecutionResult {
    if !result.exit_succeeded() {
        let detail = result.error_detail().map(str::to_string);
        return result.into_status(DomainStatus::Failed, detail);
    }

    if policy.detect_blocks && contains_any(result.raw_output(), BLOCK_MARKERS) {
        return result.into_status(DomainStatus::Blocked, Some(BLOCKED_DETAIL.to_string()));
    }

    match policy.rule {
        SuccessRule::ExitOnly => result.into_status(DomainStatus::Success, None),
        SuccessRule::MarkerBased if contains_any(result.raw_output(), SUCCESS_MARKERS) => {
            result.into_status(DomainStatus::Success, None)
        }
        SuccessRule::MarkerBased => result.into_status(
            DomainStatus::Failed,
            Some(NO_SUCCESS_MARKER_DETAIL.to_string()),
        ),
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;

    const MARKERS: ClassificationPolicy =
        ClassificationPolicy::with_block_detection(SuccessRule::MarkerBased);
    const READ_ONLY: ClassificationPolicy =
        ClassificationPolicy::with_block_detection(SuccessRule::ExitOnly);

    #[test]
    fn marker_based_accepts_success_markers() {
        for output in ["Command EXECUTED", "Success", "remote service: Success\n"] {
            let result = classify(ExecutionResult::completed(output), MARKERS);
            assert_eq!(result.domain_status(), DomainStatus::Success, "{output}");
            assert_eq!(result.error_detail(), None);
        }
    }

    #[test]
    fn marker_based_rejects_output_without_markers() {
        for output in ["", "Command PENDING", "success", "executed"] {
            let result = classify(ExecutionResult::completed(output), MARKERS);
            assert_eq!(result.domain_status(), DomainStatus::Failed, "{output}");
            assert_eq!(result.failure_kind(), Some(FailureKind::DomainFailure));
            assert_eq!(result.error_detail(), Some(NO_SUCCESS_MARKER_DETAIL));
        }
    }

    #[test]
    fn block_markers_override_success_markers() {
        for output in [
            "Error: 489 Blocked by region",
            "Command EXECUTED but Blocked",
            "Success 489",
        ] {
            let result = classify(ExecutionResult::completed(output), MARKERS);
            assert_eq!(result.domain_status(), DomainStatus::Blocked, "{output}");
            assert_eq!(result.error_detail(), Some(BLOCKED_DETAIL));
        }
    }

    #[test]
    fn block_markers_apply_to_read_only_policy() {
        let result = classify(ExecutionResult::completed("HTTP 489"), READ_ONLY);
        assert_eq!(result.domain_status(), DomainStatus::Blocked);
        assert!(result.exit_succeeded());
    }

    #[test]
    fn exit_only_ignores_text_without_block_detection() {
        let result = classify(
            ExecutionResult::completed("Blocked 489"),
            ClassificationPolicy::EXIT_ONLY,
        );
        assert_eq!(result.domain_status(), DomainStatus::Success);
    }

    #[test]
    fn exit_only_accepts_output_without_markers() {
        let result = classify(ExecutionResult::completed("vehicle info"), READ_ONLY);
        assert_eq!(result.domain_status(), DomainStatus::Success);
    }

    #[test]
    fn process_failure_is_never_blocked() {
        let failed = ExecutionResult::failed(Some(1), "Error: 489 Blocked", "exit status 1");
        let result = classify(failed, MARKERS);
        assert_eq!(result.domain_status(), DomainStatus::Failed);
        assert_eq!(result.failure_kind(), Some(FailureKind::ProcessFailure));
        assert_eq!(result.error_detail(), Some("exit status 1"));
        assert_eq!(result.raw_output(), "Error: 489 Blocked");
    }

    #[test]
    fn block_detail_names_the_backend() {
        assert!(BLOCKED_DETAIL.starts_with("BMW API blocked"));
    }
}
