//! Result normalizer — shapes an [`InvocationResult`] into a [`ScanEnvelope`].
//!
//! Unparsable output is never a failure here: tools routinely print
//! diagnostics instead of (or around) the structured report, so a failed
//! parse just means the caller gets `raw_output` instead of `results`.

use crate::ExecutorError;
use chrono::Utc;
use sg_core::envelope::ScanEnvelope;
use sg_core::invocation::{InvocationResult, OutputFormat};

/// Build the response envelope for one invocation.
///
/// `success` comes purely from the exit status, so a scanner that exits
/// non-zero because it found something still gets its report parsed.
pub fn normalize(result: &InvocationResult, format: OutputFormat) -> ScanEnvelope {
    let success = result.success();
    let (results, raw_output) = shape_output(result, format);
    let error = if success {
        None
    } else {
        Some(failure_reason(result))
    };

    ScanEnvelope {
        success,
        timestamp: Utc::now(),
        results,
        raw_output,
        error,
    }
}

/// Parse tool stdout as JSON.
pub fn parse_structured(text: &str) -> Result<serde_json::Value, ExecutorError> {
    serde_json::from_str(text).map_err(|e| ExecutorError::Parse(e.to_string()))
}

fn shape_output(
    result: &InvocationResult,
    format: OutputFormat,
) -> (Option<serde_json::Value>, Option<String>) {
    if result.stdout.is_empty() {
        return (None, None);
    }
    let text = result.stdout_text();
    match format {
        OutputFormat::None => (None, Some(text)),
        OutputFormat::Json => match parse_structured(&text) {
            Ok(value) => (Some(value), None),
            Err(e) => {
                tracing::debug!(program = %result.program, error = %e, "[Normalizer] falling back to raw output");
                (None, Some(text))
            }
        },
    }
}

fn failure_reason(result: &InvocationResult) -> String {
    if result.timed_out {
        return ExecutorError::Timeout(result.timeout).to_string();
    }
    let stderr = result.stderr_text();
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let name = result.tool_name();
    match result.exit_status {
        Some(code) => format!("{name} exited with status {code}"),
        None => format!("{name} terminated by signal"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
