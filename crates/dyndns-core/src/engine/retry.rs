//! Bounded retry around a reconciliation attempt
//!
//! Retry logic lives here and nowhere else: resolvers and registry clients
//! are single-shot, so the retry rate stays under one explicit policy. The
//! delay between attempts is fixed, not exponential, and only the last
//! failure is surfaced once the budget is exhausted.

use crate::error::{Error, Result};
use crate::types::Reconciliation;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Fixed-delay retry policy for reconciliation attempts.
///
/// `max_attempts` counts total invocations, not re-invocations: a policy of
/// 3 runs the attempt at most three times with two inter-attempt delays.
///
/// Non-transient failures (`Unauthorized`, `Forbidden`, `NotFound`, invalid
/// input, configuration errors) short-circuit immediately, since retrying cannot
/// change those outcomes. See [`Error::is_transient`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: usize,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with `max_attempts` total attempts and a fixed
    /// `delay` between them. A zero attempt budget is clamped to one.
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Total attempt budget
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Run `attempt` until it succeeds or the budget is exhausted.
    ///
    /// Success (`Unchanged` or `Updated`) stops immediately. On exhaustion
    /// the last failure reason is returned.
    pub async fn run<F, Fut>(&self, mut attempt: F) -> Result<Reconciliation>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Reconciliation>>,
    {
        let mut last_error = None;

        for n in 1..=self.max_attempts {
            match attempt().await {
                Ok(outcome) => return Ok(outcome),
                Err(err) if !err.is_transient() => {
                    warn!(attempt = n, error = %err, "non-transient failure, not retrying");
                    return Err(err);
                }
                Err(err) => {
                    warn!(
                        attempt = n,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "reconciliation attempt failed"
                    );
                    last_error = Some(err);

                    if n < self.max_attempts {
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }
        }

        // max_attempts >= 1, so at least one error was recorded
        Err(last_error
            .unwrap_or_else(|| Error::network("retry budget exhausted without an attempt")))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}
