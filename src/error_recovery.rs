// src/error_recovery.rs
//! Retry with exponential backoff for API operations.

use crate::constants::{RETRY_INITIAL_DELAY, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY};
use crate::error::AppError;
use std::time::Duration;

/// Backoff schedule for a retried operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            initial_delay: RETRY_INITIAL_DELAY,
            max_delay: RETRY_MAX_DELAY,
        }
    }
}

/// Retries an async operation with exponential backoff.
///
/// Errors that [`AppError::is_retryable`] rejects are returned immediately.
pub async fn retry_with_backoff<F, T, Fut>(
    mut operation: F,
    policy: RetryPolicy,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let mut delay = policy.initial_delay;
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                if attempt < policy.max_attempts {
                    log::warn!(
                        "Attempt {} failed ({}), retrying after {:?}",
                        attempt,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;

                    // Exponential backoff with cap
                    delay = std::cmp::min(delay * 2, policy.max_delay);
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| AppError::InternalError {
        message: "Retry failed with no error".to_string(),
        source: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotionErrorCode;
    use std::cell::Cell;

    fn quick_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    fn transient() -> AppError {
        AppError::NotionService {
            code: NotionErrorCode::RateLimited,
            message: "slow down".to_string(),
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
        }
    }

    #[tokio::test]
    async fn test_retries_transient_errors_until_success() {
        let calls = Cell::new(0);
        let result = retry_with_backoff(
            || {
                calls.set(calls.get() + 1);
                let attempt = calls.get();
                async move {
                    if attempt < 3 {
                        Err(transient())
                    } else {
                        Ok(attempt)
                    }
                }
            },
            quick_policy(),
        )
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result: Result<(), AppError> = retry_with_backoff(
            || {
                calls.set(calls.get() + 1);
                async { Err(transient()) }
            },
            quick_policy(),
        )
        .await;

        assert!(matches!(result, Err(AppError::NotionService { .. })));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), AppError> = retry_with_backoff(
            || {
                calls.set(calls.get() + 1);
                async {
                    Err(AppError::NotionService {
                        code: NotionErrorCode::ObjectNotFound,
                        message: "gone".to_string(),
                        status: reqwest::StatusCode::NOT_FOUND,
                    })
                }
            },
            quick_policy(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
