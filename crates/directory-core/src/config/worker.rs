//! Scheduled sweep configuration.

use serde::{Deserialize, Serialize};

/// Cron settings for the expiration sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression for the deal expiration sweep.
    #[serde(default = "default_deal_cron")]
    pub deal_expiry_cron: String,
    /// Six-field cron expression for the subscription expiration sweep.
    #[serde(default = "default_subscription_cron")]
    pub subscription_expiry_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            deal_expiry_cron: default_deal_cron(),
            subscription_expiry_cron: default_subscription_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_deal_cron() -> String {
    "0 0 * * * *".to_string()
}

fn default_subscription_cron() -> String {
    "0 30 2 * * *".to_string()
}
