//! Cron scheduler for the expiration sweeps.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use directory_core::config::WorkerConfig;
use directory_core::error::AppError;

use crate::jobs::{ExpirationJob, SweepKind};

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Sweep runner shared by every registered job
    job: ExpirationJob,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(job: ExpirationJob) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, job })
    }

    /// Register both sweeps on the schedules in `config`
    pub async fn register_sweeps(&self, config: &WorkerConfig) -> Result<(), AppError> {
        self.register(SweepKind::Deals, &config.deal_expiry_cron)
            .await?;
        self.register(SweepKind::Subscriptions, &config.subscription_expiry_cron)
            .await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    async fn register(&self, kind: SweepKind, schedule: &str) -> Result<(), AppError> {
        let job = self.job.clone();
        let cron = CronJob::new_async(schedule, move |_uuid, _lock| {
            let job = job.clone();
            Box::pin(async move {
                job.run_logged(kind).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid {} schedule '{}': {}", kind, schedule, e))
        })?;

        self.scheduler
            .add(cron)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {} schedule: {}", kind, e)))?;

        tracing::info!(job = %kind, schedule, "Registered sweep");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use directory_core::error::ErrorKind;
    use directory_database::MemoryStore;
    use directory_service::ExpirationSweeps;

    use super::*;

    async fn scheduler() -> CronScheduler {
        let store = Arc::new(MemoryStore::new());
        let job = ExpirationJob::new(ExpirationSweeps::new(store.clone(), store));
        CronScheduler::new(job).await.unwrap()
    }

    #[tokio::test]
    async fn test_registers_default_schedules() {
        let scheduler = scheduler().await;
        scheduler
            .register_sweeps(&WorkerConfig::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_invalid_cron_is_a_configuration_error() {
        let scheduler = scheduler().await;
        let config = WorkerConfig {
            deal_expiry_cron: "99 * * * * *".into(),
            ..WorkerConfig::default()
        };
        let err = scheduler.register_sweeps(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
