use crate::error::PantryError;
use std::future::Future;
use std::time::Duration;

/// Bound an external call so a turn cannot hang on it.
pub(crate) async fn with_timeout<T, F>(
    timeout: Duration,
    operation: &str,
    fut: F,
) -> Result<T, PantryError>
where
    F: Future<Output = Result<T, PantryError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(PantryError::timeout(operation, timeout.as_secs())),
    }
}
