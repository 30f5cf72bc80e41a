//! Resilient fetch layer
//!
//! Every upstream call goes through `FetchClient::fetch_with_retry`:
//! - each attempt is bounded by a timeout that aborts the in-flight request
//! - thrown errors (connection failure, timeout) are retried with
//!   exponential backoff, up to the configured attempt count
//! - HTTP error statuses are NOT retried here; they are returned as
//!   ordinary responses for the caller to classify
//!
//! The backoff schedule lives in `RetryPolicy::delay_for`, a pure function
//! so the schedule is testable without sleeping.

use crate::error::WolError;
use reqwest::header::ACCEPT;
use std::time::Duration;

/// Bounded retry policy with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first (default: 3)
    pub max_attempts: u32,
    /// Backoff unit; attempt n waits base_delay * 2^n (default: 1s)
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with a custom attempt count
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Shrink the backoff unit (used by tests to retry without real delay)
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before retrying after a failed attempt (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// HTTP GET wrapper with timeout and bounded retries
pub struct FetchClient {
    client: reqwest::Client,
    policy: RetryPolicy,
    timeout: Duration,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new(RetryPolicy::default(), Duration::from_secs(30))
    }
}

impl FetchClient {
    /// Create a fetch client with the given retry policy and per-attempt timeout
    pub fn new(policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            policy,
            timeout,
        }
    }

    /// Per-attempt timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retry policy in effect
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET a URL, retrying transport failures with exponential backoff.
    ///
    /// Returns the response whatever its status; the final attempt's error
    /// propagates as `WolError::Network`.
    pub async fn fetch_with_retry(
        &self,
        url: &str,
        accept: &str,
    ) -> Result<reqwest::Response, WolError> {
        let last_attempt = self.policy.max_attempts.saturating_sub(1);
        let mut last_error = None;

        for attempt in 0..self.policy.max_attempts {
            match self
                .client
                .get(url)
                .header(ACCEPT, accept)
                .timeout(self.timeout)
                .send()
                .await
            {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!(
                        "Fetch attempt {}/{} failed for {}: {}",
                        attempt + 1,
                        self.policy.max_attempts,
                        url,
                        e
                    );
                    if attempt == last_attempt {
                        return Err(WolError::network(format!(
                            "Failed to fetch {} after {} attempts: {}",
                            url, self.policy.max_attempts, e
                        )));
                    }
                    last_error = Some(e);
                    tokio::time::sleep(self.policy.delay_for(attempt)).await;
                }
            }
        }

        // Unreachable with max_attempts >= 1; kept for a zero-attempt policy.
        Err(last_error
            .map(|e| WolError::network(e.to_string()))
            .unwrap_or_else(|| WolError::network(format!("No fetch attempts made for {}", url))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
    }

    #[test]
    fn test_delay_respects_base_unit() {
        let policy = RetryPolicy::new(5).with_base_delay(Duration::from_millis(10));
        assert_eq!(policy.delay_for(0), Duration::from_millis(10));
        assert_eq!(policy.delay_for(2), Duration::from_millis(40));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_connection_error_exhausts_attempts() {
        // Port 1 is reserved and nothing listens on it.
        let client = FetchClient::new(
            RetryPolicy::new(2).with_base_delay(Duration::from_millis(1)),
            Duration::from_millis(500),
        );
        let result = client
            .fetch_with_retry("http://127.0.0.1:1/unreachable", "text/html")
            .await;
        assert!(matches!(result, Err(WolError::Network(_))));
    }
}
