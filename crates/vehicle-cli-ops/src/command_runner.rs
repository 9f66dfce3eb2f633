use crate::ExecutionResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Runs one external command and reports how it went.
///
/// Implementations never return an error: spawn failures, non-zero exits and
/// timeouts are all folded into the returned [`ExecutionResult`].
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    async fn invoke(&self, argv: &[String]) -> ExecutionResult;
}

/// Spawns real child processes with tokio, one per call.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessInvoker {
    timeout: Option<Duration>,
}

impl TokioProcessInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child and report a timeout once `limit` has elapsed.
    pub fn with_timeout(limit: Duration) -> Self {
        Self {
            timeout: Some(limit),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl ProcessInvoker for TokioProcessInvoker {
    async fn invoke(&self, argv: &[String]) -> ExecutionResult {
        let Some((program, args)) = argv.split_first() else {
            return ExecutionResult::failed(None, "", "empty command line");
        };
        let command_repr = argv.join(" ");

        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        apply_non_interactive_env(&mut cmd);

        info!(command = %command_repr, "executing command");
        let started = Instant::now();

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                error!(command = %command_repr, error = %err, "failed to spawn command");
                return ExecutionResult::failed(
                    None,
                    "",
                    format!("failed to execute {program}: {err}"),
                );
            }
        };

        let stdout = SharedBuffer::default();
        let stderr = SharedBuffer::default();
        let mut stdout_task = collect(child.stdout.take(), stdout.clone());
        let mut stderr_task = collect(child.stderr.take(), stderr.clone());

        let finished = async {
            let status = child.wait().await;
            let _ = (&mut stdout_task).await;
            let _ = (&mut stderr_task).await;
            status
        };

        let status = match self.timeout {
            Some(limit) => {
                let outcome = timeout(limit, finished).await;
                let Ok(status) = outcome else {
                    if let Err(err) = child.kill().await {
                        warn!(command = %command_repr, error = %err, "failed to kill timed out command");
                    }
                    stdout_task.abort();
                    stderr_task.abort();
                    let raw_output = merge_output(&stdout.lock(), &stderr.lock());
                    error!(
                        command = %command_repr,
                        timeout_ms = limit.as_millis() as u64,
                        captured_bytes = raw_output.len(),
                        "command timed out"
                    );
                    debug!(command = %command_repr, output = %raw_output, "partial command output");
                    return ExecutionResult::timed_out(raw_output, limit);
                };
                status
            }
            None => finished.await,
        };

        let raw_output = merge_output(&stdout.lock(), &stderr.lock());
        let status = match status {
            Ok(status) => status,
            Err(err) => {
                error!(command = %command_repr, error = %err, "failed to wait for command");
                return ExecutionResult::failed(
                    None,
                    raw_output,
                    format!("failed to wait for {program}: {err}"),
                );
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(command = %command_repr, output = %raw_output, "command output");

        if status.success() {
            info!(command = %command_repr, elapsed_ms, "command exited cleanly");
            ExecutionResult::completed(raw_output)
        } else {
            let detail = describe_exit(&command_repr, status);
            error!(
                command = %command_repr,
                exit_code = ?status.code(),
                elapsed_ms,
                "command failed"
            );
            ExecutionResult::failed(status.code(), raw_output, detail)
        }
    }
}

/// Bytes read from one child pipe so far.
type SharedBuffer = Arc<Mutex<Vec<u8>>>;

/// Drain `reader` into `buffer` chunk by chunk, so a killed child still
/// leaves behind everything it printed.
fn collect<R>(reader: Option<R>, buffer: SharedBuffer) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut reader) = reader else {
            return;
        };
        let mut chunk = [0u8; 4096];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => buffer.lock().extend_from_slice(&chunk[..n]),
            }
        }
    })
}

fn apply_non_interactive_env(cmd: &mut Command) {
    cmd.env("NO_COLOR", "1");
    cmd.env("CLICOLOR", "0");
}

/// Joins both streams into one text, stdout first.
fn merge_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut merged = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !merged.is_empty() && !merged.ends_with('\n') {
            merged.push('\n');
        }
        merged.push_str(&String::from_utf8_lossy(stderr));
    }
    merged
}

fn describe_exit(command_repr: &str, status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("Command '{command_repr}' returned non-zero exit status {code}."),
        None => format!("Command '{command_repr}' was terminated by {}", signal_summary(status)),
    }
}

#[cfg(unix)]
fn signal_summary(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => format!("signal {signal}"),
        None => "an unknown signal".to_string(),
    }
}

#[cfg(not(unix))]
fn signal_summary(_status: ExitStatus) -> String {
    "an unknown signal".to_string()
}
