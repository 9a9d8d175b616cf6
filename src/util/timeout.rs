//! Deadline for backend calls.

use std::future::Future;
use std::time::Duration;

use crate::error::PipeError;

/// Fail with [`PipeError::Timeout`] if `future` outlives `limit`.
pub async fn with_timeout<T>(
    limit: Duration,
    future: impl Future<Output = Result<T, PipeError>>,
) -> Result<T, PipeError> {
    tokio::time::timeout(limit, future)
        .await
        .unwrap_or_else(|_| Err(PipeError::Timeout(limit.as_millis() as u64)))
}
