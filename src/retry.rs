// =============================================================================
// Bounded retry with exponential backoff for read-only HTTP fetches
// =============================================================================
//
// Only transport failures (connect, DNS, timeout, body errors surfaced by
// `send`) are retried. A response with any status code is returned to the
// caller as-is: upstream statuses are part of each client's contract.
// =============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Upper bound for a single backoff sleep.
const MAX_DELAY: Duration = Duration::from_secs(10);

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `0` is treated as `1`.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry; doubles for each further retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
        }
    }

    /// Backoff before retry number `retry` (1-based): `base * 2^(retry-1)`,
    /// capped at [`MAX_DELAY`].
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1).min(16);
        let millis = self.base_delay_ms.saturating_mul(1u64 << exp);
        Duration::from_millis(millis).min(MAX_DELAY)
    }

    /// Send the request produced by `make`, retrying transport errors.
    ///
    /// `make` is called once per attempt because a `RequestBuilder` is
    /// consumed by `send`.
    pub async fn send<F>(&self, label: &str, make: F) -> reqwest::Result<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match make().send().await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        label,
                        attempt,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transport error, backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if attempts > 1 {
                        info!(label, attempts, "giving up after final attempt");
                    }
                    return Err(e);
                }
            }
        }
    }
}
