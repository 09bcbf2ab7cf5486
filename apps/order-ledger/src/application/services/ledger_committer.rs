//! Retried atomic commit of ledger change sets.

use std::sync::Arc;

use crate::application::ports::{LedgerChangeSet, UnitOfWorkPort};
use crate::domain::shared::RepositoryError;
use crate::observability::{record_commit_failure, record_commit_retry};
use crate::resilience::{ExponentialBackoffCalculator, RetryPolicy};

/// Commits change sets through a unit of work, retrying transient failures
/// with exponential backoff.
pub struct LedgerCommitter<U: UnitOfWorkPort + ?Sized> {
    uow: Arc<U>,
    policy: RetryPolicy,
}

impl<U: UnitOfWorkPort + ?Sized> LedgerCommitter<U> {
    /// Create a committer over `uow`.
    pub const fn new(uow: Arc<U>, policy: RetryPolicy) -> Self {
        Self { uow, policy }
    }

    /// The retry policy in use.
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Commit `changes`.
    ///
    /// # Errors
    ///
    /// Returns the first non-transient error, or the last transient one once
    /// the retry budget is spent. Nothing has been written in either case.
    pub async fn commit(&self, changes: &LedgerChangeSet) -> Result<(), RepositoryError> {
        let mut backoff = ExponentialBackoffCalculator::new(&self.policy);
        let order_id = changes.order.order().id();

        loop {
            match self.uow.commit(changes).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() => match backoff.next_backoff() {
                    Some(delay) => {
                        record_commit_retry();
                        tracing::warn!(
                            order_id = %order_id,
                            attempt = backoff.retries_used(),
                            delay_ms = delay.as_millis(),
                            error = %e,
                            "Ledger commit failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        record_commit_failure();
                        tracing::error!(
                            order_id = %order_id,
                            attempts = self.policy.max_attempts,
                            error = %e,
                            "Ledger commit retries exhausted"
                        );
                        return Err(e);
                    }
                },
                Err(e) => {
                    record_commit_failure();
                    tracing::error!(order_id = %order_id, error = %e, "Ledger commit failed");
                    return Err(e);
                }
            }
        }
    }
}
