//! Retry logic with exponential backoff for HTTP requests
//!
//! One generic loop drives both the JSON and the raw-binary transport. The
//! loop makes at most `max_retries + 1` attempts, waits between them with a
//! jittered exponential delay, and stops early on success, on an error that
//! is not retryable, or when the call is cancelled.

use rand::Rng;
use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::http::context::CallOptions;

/// Fraction of the base delay used as symmetric jitter
const JITTER_FACTOR: f64 = 0.25;

/// Exponents past this point saturate to `max_wait` anyway
const MAX_EXPONENT: u32 = 62;

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, before jitter
    pub min_wait: Duration,
    /// Upper bound for any single wait
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, min_wait: Duration, max_wait: Duration) -> Self {
        Self {
            max_retries,
            min_wait,
            max_wait,
        }
    }

    /// A policy that makes exactly one attempt
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Un-jittered delay before retry `attempt` (1-based), clamped to `max_wait`
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let base = self.base_secs(attempt).min(self.max_wait.as_secs_f64());
        Duration::try_from_secs_f64(base).unwrap_or(self.max_wait)
    }

    /// Jittered delay before retry `attempt` using the thread-local RNG
    pub fn delay(&self, attempt: u32) -> Duration {
        self.delay_with(attempt, &mut rand::thread_rng())
    }

    /// Jittered delay before retry `attempt` drawn from `rng`.
    ///
    /// The jitter is applied before clamping to `max_wait` and the low end is
    /// not re-clamped, so the result may land up to 25% under `min_wait`.
    pub fn delay_with<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let base = self.base_secs(attempt);
        let jitter = base * JITTER_FACTOR * rng.gen_range(-1.0..1.0);
        let wait = (base + jitter).min(self.max_wait.as_secs_f64()).max(0.0);
        Duration::try_from_secs_f64(wait).unwrap_or(self.max_wait)
    }

    fn base_secs(&self, attempt: u32) -> f64 {
        let min = self.min_wait.as_secs_f64();
        if min == 0.0 {
            return 0.0;
        }
        let exponent = attempt.saturating_sub(1).min(MAX_EXPONENT);
        min * 2f64.powi(exponent as i32)
    }
}

/// Decision on whether to retry a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the request after the specified delay
    Retry { delay: Duration },
    /// Surface the error to the caller
    NoRetry,
}

/// Drives a fallible attempt through the retry state machine
#[derive(Debug, Clone, Default)]
pub struct Retrier {
    policy: RetryPolicy,
}

impl Retrier {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Decide what follows a failed attempt with 0-based index `attempt`
    pub fn should_retry(&self, attempt: u32, error: &Error) -> RetryDecision {
        if !error.is_retryable() || attempt >= self.policy.max_retries {
            return RetryDecision::NoRetry;
        }
        RetryDecision::Retry {
            delay: self.policy.delay(attempt + 1),
        }
    }

    /// Run `attempt_fn` until it succeeds, fails permanently, exhausts the
    /// retry budget, or `options` cancels the call.
    ///
    /// The closure receives the 0-based attempt index. Cancellation is
    /// observed both during backoff waits and while an attempt is in flight;
    /// an in-flight attempt is dropped when cancellation wins.
    pub async fn run<T, F, Fut>(&self, options: &CallOptions, mut attempt_fn: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        let mut delay = Duration::ZERO;

        loop {
            if attempt > 0 {
                tokio::select! {
                    biased;
                    reason = options.cancelled() => {
                        tracing::debug!(attempt, %reason, "Call abandoned during backoff");
                        return Err(Error::Cancelled(reason));
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            tracing::debug!(attempt, "Starting attempt");
            let outcome = tokio::select! {
                biased;
                reason = options.cancelled() => {
                    tracing::debug!(attempt, %reason, "Call abandoned during attempt");
                    return Err(Error::Cancelled(reason));
                }
                outcome = attempt_fn(attempt) => outcome,
            };

            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            match self.should_retry(attempt, &error) {
                RetryDecision::Retry { delay: next } => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.policy.max_retries,
                        delay_ms = next.as_millis() as u64,
                        error = %error,
                        "Request failed, retrying"
                    );
                    delay = next;
                    attempt += 1;
                }
                RetryDecision::NoRetry => {
                    if error.is_retryable() {
                        tracing::error!(
                            attempts = attempt + 1,
                            error = %error,
                            "Request failed, retries exhausted"
                        );
                    }
                    return Err(error);
                }
            }
        }
    }
}
