//! Per-source execution for the search fan-out.
//!
//! Each category read runs under its own timeout and yields a typed
//! [`SourceResult`]. Errors keep their reason until [`collapse`] logs them
//! and substitutes an empty value at the response boundary.

use crate::error::AppError;
use std::future::Future;
use std::time::Duration;

/// Why a search source produced no results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Failed(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Run one source under `timeout`.
pub async fn run_source<T, F>(timeout: Duration, fut: F) -> SourceResult<T>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(SourceError::Failed(err.to_string())),
        Err(_) => Err(SourceError::Timeout(timeout)),
    }
}

/// Log a failed source and fall back to its empty value.
pub fn collapse<T: Default>(source: &'static str, result: SourceResult<T>) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(source, error = %err, "Search source failed, returning empty results");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_source_passes_value_through() {
        let result = run_source(Duration::from_millis(50), async { Ok::<_, AppError>(3) }).await;
        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn test_run_source_keeps_failure_reason() {
        let result: SourceResult<u32> = run_source(Duration::from_millis(50), async {
            Err(AppError::Database("index missing".to_string()))
        })
        .await;

        match result {
            Err(SourceError::Failed(reason)) => assert!(reason.contains("index missing")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_source_times_out() {
        let result: SourceResult<u32> = run_source(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        })
        .await;

        assert_eq!(result, Err(SourceError::Timeout(Duration::from_millis(10))));
    }

    #[test]
    fn test_collapse_substitutes_default() {
        let empty: Vec<u32> = collapse("videos", Err(SourceError::Failed("boom".to_string())));
        assert!(empty.is_empty());
        assert_eq!(collapse("videos", Ok(vec![1, 2])), vec![1, 2]);
    }
}
