//! Local business directory server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use directory_api::{AppState, Backends, build_app};
use directory_core::config::AppConfig;
use directory_core::traits::{IdentityGateway, WebhookVerifier};
use directory_database::DatabasePool;
use directory_identity::{ClerkClient, NoVerification, SvixVerifier};
use directory_worker::{CronScheduler, ExpirationJob};

#[tokio::main]
async fn main() {
    let env = std::env::var("DIRECTORY_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting local directory v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database)
        .await
        .context("Database connection failed")?;

    if config.database.run_migrations {
        directory_database::migration::run_migrations(db.pool())
            .await
            .context("Migration failed")?;
    }
    let backends = Backends::postgres(db.pool());

    // ── Step 2: Object storage ───────────────────────────────────
    tracing::info!(provider = %config.storage.provider, "Initializing storage provider...");
    let storage = directory_storage::build_provider(&config.storage)
        .await
        .context("Storage init failed")?;

    // ── Step 3: Identity provider ────────────────────────────────
    let gateway: Arc<dyn IdentityGateway> = Arc::new(
        ClerkClient::new(&config.identity).context("Identity client init failed")?,
    );
    let verifier: Arc<dyn WebhookVerifier> = if config.identity.verify_webhooks {
        Arc::new(
            SvixVerifier::new(&config.identity.webhook_secret)
                .context("Webhook secret is invalid")?,
        )
    } else {
        tracing::warn!("Webhook signature verification is disabled");
        Arc::new(NoVerification)
    };

    // ── Step 4: Scheduled sweeps ─────────────────────────────────
    let scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new(ExpirationJob::new(backends.sweeps())).await?;
        scheduler.register_sweeps(&config.worker).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Scheduled sweeps disabled");
        None
    };

    // ── Step 5: Build and start HTTP server ─────────────────────
    let server_config = config.server.clone();
    let state = AppState::new(
        config,
        &backends,
        gateway,
        storage,
        verifier,
        Some(db.clone()),
    );
    let app = build_app(state);

    let addr = format!("{}:{}", server_config.host, server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Directory server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .context("Server error")?;

    // ── Step 6: Stop background tasks ───────────────────────────
    if let Some(scheduler) = scheduler {
        let grace = Duration::from_secs(server_config.shutdown_grace_seconds);
        match tokio::time::timeout(grace, scheduler.shutdown()).await {
            Ok(Err(e)) => tracing::warn!(error = %e, "Scheduler shutdown failed"),
            Err(_) => tracing::warn!("Scheduler did not stop within the grace period"),
            Ok(Ok(())) => {}
        }
    }
    db.close().await;

    tracing::info!("Directory server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
