//! Liveness probe for locally installed tools.

use crate::local::invoke;
use sg_core::invocation::InvocationRequest;
use sg_core::tool::ToolCommand;
use std::time::Duration;

/// Run `<tool> --version` and report whether it exited 0 within `probe_timeout`.
///
/// Every failure (missing binary, non-zero exit, timeout) is `false`; the
/// reason is logged at debug level and otherwise dropped.
pub async fn tool_available(command: &ToolCommand, probe_timeout: Duration) -> bool {
    let request = match InvocationRequest::new(command.argv_with(["--version"]), probe_timeout) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(program = %command.program, error = %e, "[Probe] invalid probe command");
            return false;
        }
    };

    match invoke(&request).await {
        Ok(result) => {
            if !result.success() {
                tracing::debug!(
                    program = %command.program,
                    exit_status = ?result.exit_status,
                    timed_out = result.timed_out,
                    "[Probe] tool not healthy"
                );
            }
            result.success()
        }
        Err(e) => {
            tracing::debug!(program = %command.program, error = %e, "[Probe] tool unavailable");
            false
        }
    }
}
