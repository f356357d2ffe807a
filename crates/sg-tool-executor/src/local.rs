//! Local executor: child process spawning with a hard wall-clock bound.

use crate::timeout::with_timeout;
use crate::ExecutorError;
use sg_core::invocation::{InvocationRequest, InvocationResult};
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Run an external command and capture its output.
///
/// stdin is closed; stdout and stderr are buffered fully in memory, so callers
/// are responsible for only running tools with bounded output. A process that
/// outlives `request.timeout()` is killed together with everything it started,
/// and reaped before this returns; the result comes back with `timed_out` set
/// rather than as an `Err`.
///
/// Spawn failures (missing executable, permissions, ...) are
/// [`ExecutorError::Execution`]. Their message names the tool by file name
/// only; the configured path and OS error go to the log. Nothing is retried.
pub async fn invoke(request: &InvocationRequest) -> Result<InvocationResult, ExecutorError> {
    let start = Instant::now();
    let program = request.program();
    let name = request.tool_name();

    tracing::info!(program, argc = request.args().len(), "[Executor] spawning tool");

    let mut command = Command::new(program);
    command
        .args(request.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command.spawn().map_err(|e| {
        tracing::warn!(program, error = %e, "[Executor] spawn failed");
        ExecutorError::Execution(format!("failed to start {name}: {}", spawn_failure(&e)))
    })?;
    let mut group = ProcessGroup { pgid: child.id() };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Drain both pipes while waiting so a chatty tool can't block on a full pipe.
    let waited = with_timeout(request.timeout(), async {
        let (status, stdout, stderr) =
            tokio::join!(child.wait(), read_pipe(stdout), read_pipe(stderr));
        let status = status.map_err(|e| {
            tracing::warn!(program, error = %e, "[Executor] wait failed");
            ExecutorError::Execution(format!("failed waiting for {name}"))
        })?;
        let stdout = stdout.map_err(|e| {
            tracing::warn!(program, error = %e, "[Executor] stdout read failed");
            ExecutorError::Execution(format!("failed reading output of {name}"))
        })?;
        let stderr = stderr.map_err(|e| {
            tracing::warn!(program, error = %e, "[Executor] stderr read failed");
            ExecutorError::Execution(format!("failed reading output of {name}"))
        })?;
        Ok((status, stdout, stderr))
    })
    .await;

    match waited {
        Ok((status, stdout, stderr)) => {
            group.disarm();
            let elapsed = start.elapsed();
            tracing::debug!(
                program,
                exit_status = ?status.code(),
                elapsed_ms = elapsed.as_millis() as u64,
                stdout_bytes = stdout.len(),
                "[Executor] tool finished"
            );
            Ok(InvocationResult {
                program: program.to_string(),
                exit_status: status.code(),
                stdout,
                stderr,
                timed_out: false,
                timeout: request.timeout(),
                elapsed,
            })
        }
        Err(ExecutorError::Timeout(limit)) => {
            // The group must go while its leader is still unreaped, so the
            // pgid cannot have been recycled. kill() then reaps the leader.
            group.kill();
            if let Err(e) = child.kill().await {
                tracing::warn!(program, error = %e, "[Executor] failed to kill timed-out tool");
            }
            let elapsed = start.elapsed();
            tracing::warn!(
                program,
                timeout_ms = limit.as_millis() as u64,
                "[Executor] tool timed out and was killed"
            );
            Ok(InvocationResult {
                program: program.to_string(),
                exit_status: None,
                stdout: Vec::new(),
                stderr: Vec::new(),
                timed_out: true,
                timeout: limit,
                elapsed,
            })
        }
        Err(e) => Err(e),
    }
}

fn spawn_failure(e: &std::io::Error) -> &'static str {
    match e.kind() {
        ErrorKind::NotFound => "executable not found",
        ErrorKind::PermissionDenied => "permission denied",
        _ => "could not be executed",
    }
}

/// Process group the tool runs in. Killed on drop unless disarmed.
///
/// `kill_on_drop` only reaches the direct child; helpers it started (a JVM
/// behind a launcher script) share its group and go down with it.
struct ProcessGroup {
    pgid: Option<u32>,
}

impl ProcessGroup {
    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_group(pgid);
        }
    }

    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_group(pgid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return;
    };
    // SAFETY: killpg takes plain integers and only sends a signal.
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } == -1 {
        let e = std::io::Error::last_os_error();
        if e.raw_os_error() != Some(libc::ESRCH) {
            tracing::warn!(pgid, error = %e, "[Executor] failed to kill process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_group(_pgid: u32) {}

async fn read_pipe<R>(pipe: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
