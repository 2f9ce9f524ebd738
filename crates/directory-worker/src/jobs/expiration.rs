//! Deal and subscription expiration jobs.

use std::fmt;

use tracing;

use directory_core::result::AppResult;
use directory_service::ExpirationSweeps;

/// Which expiration sweep to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepKind {
    /// ACTIVE deals past their end date.
    Deals,
    /// ACTIVE subscriptions past their end date.
    Subscriptions,
}

impl SweepKind {
    /// Job name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Deals => "deal_expiry",
            Self::Subscriptions => "subscription_expiry",
        }
    }
}

impl fmt::Display for SweepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs one sweep per invocation.
#[derive(Debug, Clone)]
pub struct ExpirationJob {
    sweeps: ExpirationSweeps,
}

impl ExpirationJob {
    /// Create a new expiration job
    pub fn new(sweeps: ExpirationSweeps) -> Self {
        Self { sweeps }
    }

    /// Run a sweep and return how many rows expired.
    pub async fn run(&self, kind: SweepKind) -> AppResult<u64> {
        match kind {
            SweepKind::Deals => self.sweeps.expire_deals().await,
            SweepKind::Subscriptions => self.sweeps.expire_subscriptions().await,
        }
    }

    /// Run a sweep from the scheduler. Failures are logged, never raised,
    /// so one bad run does not stop later ones.
    pub async fn run_logged(&self, kind: SweepKind) -> Option<u64> {
        tracing::debug!(job = %kind, "Running expiration sweep");
        match self.run(kind).await {
            Ok(expired) => Some(expired),
            Err(e) => {
                tracing::error!(job = %kind, error = %e, "Expiration sweep failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use directory_database::MemoryStore;

    use super::*;

    fn job() -> ExpirationJob {
        let store = Arc::new(MemoryStore::new());
        ExpirationJob::new(ExpirationSweeps::new(store.clone(), store))
    }

    #[tokio::test]
    async fn test_sweeps_on_empty_store() {
        let job = job();
        assert_eq!(job.run_logged(SweepKind::Deals).await, Some(0));
        assert_eq!(job.run_logged(SweepKind::Subscriptions).await, Some(0));
    }

    #[test]
    fn test_job_names() {
        assert_eq!(SweepKind::Deals.to_string(), "deal_expiry");
        assert_eq!(SweepKind::Subscriptions.name(), "subscription_expiry");
    }
}
