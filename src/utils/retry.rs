use std::{future::Future, time::Duration};

use serde::Deserialize;
use tracing::{debug, error, warn};

use super::deserialize_duration;
use crate::framework::Error;

#[derive(Debug, Deserialize, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct Policy {
    /// total number of attempts, the first one included
    pub max_attempts: u32,
    #[serde(deserialize_with = "deserialize_duration")]
    pub backoff_unit: Duration,
    pub backoff_factor: u32,
    #[serde(deserialize_with = "deserialize_duration")]
    pub max_backoff: Duration,
}

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_DELAY: u64 = 1_000;

impl Default for Policy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_unit: Duration::from_millis(DEFAULT_BACKOFF_DELAY),
            backoff_factor: 2,
            max_backoff: Duration::from_millis(10 * DEFAULT_BACKOFF_DELAY),
        }
    }
}

/// Delay to wait after the failed `attempt` (1-based) before starting the
/// next one: `min(unit * factor^(attempt - 1), max_backoff)`.
pub fn compute_backoff_delay(policy: &Policy, attempt: u32) -> Duration {
    let units = policy
        .backoff_factor
        .saturating_pow(attempt.saturating_sub(1));

    let backoff = policy
        .backoff_unit
        .checked_mul(units)
        .unwrap_or(Duration::MAX);

    core::cmp::min(backoff, policy.max_backoff)
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// policy runs out of attempts. The error of the last attempt is returned.
pub async fn retry_operation<T, F, Fut>(mut op: F, policy: &Policy) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match op().await {
            Ok(x) => break Ok(x),
            Err(err) if !err.is_retryable() => break Err(err),
            Err(err) if attempt < policy.max_attempts => {
                warn!(attempt, "retryable operation error: {}", err);

                let backoff = compute_backoff_delay(policy, attempt);

                debug!(
                    "backoff for {}ms until next attempt #{}",
                    backoff.as_millis(),
                    attempt + 1
                );

                tokio::time::sleep(backoff).await;
            }
            Err(err) => {
                error!(attempt, "max attempts reached, failing whole operation");
                break Err(err);
            }
        }
    }
}
