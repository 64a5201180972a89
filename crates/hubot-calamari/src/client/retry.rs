//! Fixed-delay retry for transient Calamari failures.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::LeaveFetchError;

/// How often, and how far apart, transient failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Pause between attempts. Constant, not exponential.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 8,
            delay: Duration::from_secs(1),
        }
    }
}

/// 429 and every 5xx are worth another try.
pub fn is_transient(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Run `attempt` until it succeeds, fails permanently, or the retry budget
/// runs out. `attempt` receives the zero-based attempt number.
pub async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<T, LeaveFetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LeaveFetchError>>,
{
    let mut number = 0;
    loop {
        match attempt(number).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => {
                if number >= policy.max_retries {
                    return Err(LeaveFetchError::RetriesExhausted {
                        attempts: number + 1,
                        last: Box::new(e),
                    });
                }
                warn!(
                    attempt = number + 1,
                    retries_left = policy.max_retries - number,
                    "transient leave API failure (retry in {:?}): {e}",
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                number += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
