use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use deepwatch_core::DeepwatchError;

/// Runs `dial` until it succeeds, up to `attempts` tries with a fixed
/// `delay` between them. At least one attempt is always made. All attempts
/// failing yields a single `ConnectionFailed` carrying the last cause.
///
/// Takes the dialing step as a closure so the bound on the loop is
/// observable without a live endpoint.
pub async fn connect_with_retry<T, E, F, Fut>(
    mut dial: F,
    attempts: u32,
    delay: Duration,
) -> Result<T, DeepwatchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let attempts = attempts.max(1);
    let mut last = String::new();
    for attempt in 1..=attempts {
        match dial(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                last = e.to_string();
                warn!(attempt, attempts, error = %last, "connection attempt failed");
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Err(DeepwatchError::ConnectionFailed { attempts, last })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepwatch_core::ErrorKind;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn first_attempt_success_needs_no_delay() {
        let calls = AtomicU32::new(0);
        let result = connect_with_retry(
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(7u32) }
            },
            3,
            Duration::ZERO,
        )
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_within_the_budget() {
        let calls = AtomicU32::new(0);
        let result = connect_with_retry(
            |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err("refused".to_string())
                    } else {
                        Ok("up")
                    }
                }
            },
            3,
            Duration::ZERO,
        )
        .await;
        assert_eq!(result.unwrap(), "up");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_surfaces_one_connection_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = connect_with_retry(
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("refused".to_string()) }
            },
            3,
            Duration::ZERO,
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
        match err {
            DeepwatchError::ConnectionFailed { attempts, last } => {
                assert_eq!(attempts, 3);
                assert_eq!(last, "refused");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn zero_budget_still_dials_once() {
        let calls = AtomicU32::new(0);
        let _: Result<(), _> = connect_with_retry(
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("refused".to_string()) }
            },
            0,
            Duration::ZERO,
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
