//! Per-call options: cancellation, overall deadline and tracing breadcrumb

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::CancelReason;

/// Options that apply to one logical call, across all of its attempts
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    cancel: Option<CancellationToken>,
    deadline: Option<Instant>,
    breadcrumb: Option<String>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the call when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Bound the whole retry sequence, waits included. A timeout too large
    /// to represent as an instant leaves the call unbounded.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attach a breadcrumb query parameter for server-side tracing
    pub fn with_breadcrumb(mut self, breadcrumb: impl Into<String>) -> Self {
        self.breadcrumb = Some(breadcrumb.into());
        self
    }

    pub fn breadcrumb(&self) -> Option<&str> {
        self.breadcrumb.as_deref()
    }

    /// Resolves once the call should be abandoned; never resolves when
    /// neither a token nor a deadline was set.
    pub(crate) async fn cancelled(&self) -> CancelReason {
        match (&self.cancel, self.deadline) {
            (Some(token), Some(deadline)) => {
                tokio::select! {
                    _ = token.cancelled() => CancelReason::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
                }
            }
            (Some(token), None) => {
                token.cancelled().await;
                CancelReason::Cancelled
            }
            (None, Some(deadline)) => {
                tokio::time::sleep_until(deadline).await;
                CancelReason::DeadlineExceeded
            }
            (None, None) => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_cancellation() {
        let token = CancellationToken::new();
        let options = CallOptions::new().with_cancellation(token.clone());
        token.cancel();
        assert_eq!(options.cancelled().await, CancelReason::Cancelled);
    }

    #[tokio::test]
    async fn test_deadline() {
        let options = CallOptions::new().with_timeout(Duration::from_millis(5));
        assert_eq!(options.cancelled().await, CancelReason::DeadlineExceeded);
    }

    #[tokio::test]
    async fn test_huge_timeout_is_unbounded() {
        let options = CallOptions::new().with_timeout(Duration::MAX);
        assert!(options.deadline.is_none());
        let outcome =
            tokio::time::timeout(Duration::from_millis(20), options.cancelled()).await;
        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn test_no_cancellation_never_fires() {
        let options = CallOptions::new();
        let outcome =
            tokio::time::timeout(Duration::from_millis(20), options.cancelled()).await;
        assert!(outcome.is_err());
    }

    #[test]
    fn test_breadcrumb() {
        let options = CallOptions::new().with_breadcrumb("run-7");
        assert_eq!(options.breadcrumb(), Some("run-7"));
        assert_eq!(CallOptions::new().breadcrumb(), None);
    }
}
