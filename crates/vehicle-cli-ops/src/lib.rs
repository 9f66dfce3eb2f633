//! # Vehicle CLI Ops
//!
//! Typed orchestration of the vehicle-control command-line tools behind the
//! gateway.
//!
//! Vehicle CLI Ops owns process execution, session login, output
//! classification, and the per-operation policy table for the session-based
//! tool and the stateless tool. It knows nothing about HTTP.

mod authenticator;
pub mod classifier;
mod command_runner;
mod error;
mod profile;
mod router;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use authenticator::SessionAuthenticator;
pub use classifier::{classify, ClassificationPolicy, SuccessRule, BLOCKED_DETAIL};
pub use command_runner::{ProcessInvoker, TokioProcessInvoker};
pub use error::VehicleOpsError;
pub use profile::{AllowList, GatewayProfile, DEFAULT_SESSION_PROGRAM, DEFAULT_STATELESS_PROGRAM};
pub use router::{Backend, CommandRouter, InvocationPlan, LIST_OPERATION};
pub use types::{
    DomainStatus, ExecutionResult, FailureKind, Operation, StatelessMetric, StatelessStatus,
};
