//! sg-tool-executor: Bounded external tool execution and result shaping.

pub mod local;
pub mod normalize;
pub mod probe;
pub mod timeout;

use std::time::Duration;
use thiserror::Error;

pub use local::invoke;
pub use normalize::normalize;
pub use probe::tool_available;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("{0}")]
    Execution(String),
    #[error("scan timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),
    /// Tool output was not in the expected format. Never surfaced to callers;
    /// [`normalize`] falls back to raw output instead.
    #[error("unparsable tool output: {0}")]
    Parse(String),
}
