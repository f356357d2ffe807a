//! Invocation types — what to run, and what came back.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Bare file name of an executable, for messages that leave the process.
///
/// `/opt/tools/bin/trivy` becomes `trivy`; a name without directories is
/// returned unchanged.
pub fn tool_name(program: &str) -> &str {
    Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program)
}

// ---------------------------------------------------------------------------
// InvocationRequest
// ---------------------------------------------------------------------------

/// A single external command to run under a wall-clock bound.
///
/// `argv[0]` is the executable, resolved through `PATH`. Construct through
/// [`InvocationRequest::new`] so the argv/timeout invariants always hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    argv: Vec<String>,
    timeout: Duration,
}

impl InvocationRequest {
    pub fn new(argv: Vec<String>, timeout: Duration) -> Result<Self, CoreError> {
        match argv.first() {
            None => return Err(CoreError::Validation("argv must not be empty".into())),
            Some(program) if program.trim().is_empty() => {
                return Err(CoreError::Validation("executable name is empty".into()))
            }
            Some(_) => {}
        }
        if timeout.is_zero() {
            return Err(CoreError::Validation("timeout must be greater than zero".into()));
        }
        Ok(Self { argv, timeout })
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The executable (first argv element).
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// [`tool_name`] of the executable.
    pub fn tool_name(&self) -> &str {
        tool_name(self.program())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// ---------------------------------------------------------------------------
// InvocationResult
// ---------------------------------------------------------------------------

/// Everything captured from one finished (or killed) process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// Executable that was run.
    pub program: String,

    /// Exit code; `None` if the process timed out or died from a signal.
    pub exit_status: Option<i32>,

    pub stdout: Vec<u8>,

    pub stderr: Vec<u8>,

    /// Whether the process was killed for exceeding `timeout`.
    pub timed_out: bool,

    /// The bound the process ran under.
    pub timeout: Duration,

    /// Wall-clock time from spawn to reap.
    pub elapsed: Duration,
}

impl InvocationResult {
    /// Exit 0 within the bound.
    pub fn success(&self) -> bool {
        self.exit_status == Some(0) && !self.timed_out
    }

    pub fn tool_name(&self) -> &str {
        tool_name(&self.program)
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

// ---------------------------------------------------------------------------
// Output format
// ---------------------------------------------------------------------------

/// What the caller expects a tool to print on stdout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain text / log output, never parsed.
    #[default]
    None,
    Json,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
