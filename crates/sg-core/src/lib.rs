//! sg-core: Shared types for scangate
//!
//! This crate has zero internal crate dependencies and defines the
//! canonical types used across all other sg-* crates.

pub mod envelope;
pub mod invocation;
pub mod tool;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid invocation: {0}")]
    Validation(String),
}

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::envelope::ScanEnvelope;
    pub use crate::invocation::{InvocationRequest, InvocationResult, OutputFormat};
    pub use crate::tool::{ToolCommand, ToolKind};
    pub use crate::CoreError;
}
