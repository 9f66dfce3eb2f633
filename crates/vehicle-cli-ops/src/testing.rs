//! Scripted invoker for tests that must not spawn real processes.

use crate::{ExecutionResult, ProcessInvoker};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Replays queued results in order and records every argv it receives.
///
/// When the queue is empty it answers with a clean exit and empty output.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    responses: Mutex<VecDeque<ExecutionResult>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result for the next unanswered invocation.
    pub fn push(&self, result: ExecutionResult) -> &Self {
        self.responses.lock().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl ProcessInvoker for ScriptedInvoker {
    async fn invoke(&self, argv: &[String]) -> ExecutionResult {
        self.calls.lock().push(argv.to_vec());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| ExecutionResult::completed(""))
    }
}
