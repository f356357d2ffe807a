//! Scan envelope — the uniform response wrapper for every scan endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanEnvelope {
    /// True iff the tool exited 0 within its bound.
    pub success: bool,

    /// When the response was shaped (not when the tool started or ended).
    pub timestamp: DateTime<Utc>,

    /// Parsed stdout, when the tool printed the structured format we asked for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<serde_json::Value>,

    /// Unparsed stdout, when there was output but no structured parse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,

    /// Failure reason; always set when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanEnvelope {
    /// Envelope for a request that never produced a tool result.
    pub fn failure(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "unknown failure".into();
        }
        Self {
            success: false,
            timestamp: Utc::now(),
            results: None,
            raw_output: None,
            error: Some(message),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
