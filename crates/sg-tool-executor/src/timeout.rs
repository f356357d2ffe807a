//! Timeout wrapper for tool execution futures.

use crate::ExecutorError;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Wrap a tool execution future with a timeout.
///
/// Dropping the inner future on expiry is the caller's cue to clean up
/// whatever the future was driving (see [`crate::local::invoke`]).
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, ExecutorError>
where
    F: Future<Output = Result<T, ExecutorError>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ExecutorError::Timeout(limit)),
    }
}
