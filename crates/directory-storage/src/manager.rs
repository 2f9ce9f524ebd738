//! Provider selection from configuration.

use std::sync::Arc;

use tracing::info;

use directory_core::config::StorageConfig;
use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::traits::storage::StorageProvider;

use crate::providers::LocalStorageProvider;

/// Build the provider named by `config.provider`.
pub async fn build_provider(config: &StorageConfig) -> AppResult<Arc<dyn StorageProvider>> {
    let provider: Arc<dyn StorageProvider> = match config.provider.as_str() {
        "local" => Arc::new(
            LocalStorageProvider::new(&config.local.root_path, &config.local.public_base_url)
                .await?,
        ),
        #[cfg(feature = "s3")]
        "s3" => Arc::new(crate::providers::S3StorageProvider::new(&config.s3).await?),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider: '{other}'"
            )));
        }
    };
    info!(provider = provider.provider_type(), "Storage provider ready");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_provider_is_a_configuration_error() {
        let config = StorageConfig {
            provider: "ftp".into(),
            ..StorageConfig::default()
        };
        let err = build_provider(&config).await.unwrap_err();
        assert_eq!(err.kind, directory_core::error::ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_local_provider_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorageConfig::default();
        config.local.root_path = dir.path().to_string_lossy().into_owned();
        let provider = build_provider(&config).await.unwrap();
        assert_eq!(provider.provider_type(), "local");
    }
}
