use anyhow::Context;
use std::path::{Path, PathBuf};
use stock_sync::utils::periodic_cleanup;
use stock_sync::{BackgroundTasks, Config, SyncEngine, SyncWorker, TaskKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenv::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Console logging so the reason is visible before exiting
            let _ = stock_sync::init_logger("info", false);
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e).context("failed to load configuration");
        }
    };

    stock_sync::init_logger_with_file(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
    )
    .context("failed to initialize logging")?;

    tracing::info!(
        source = %config.source_api_url,
        target = %config.target_api_base_url,
        "Stock sync starting"
    );

    if let Some(dir) = &config.log_dir
        && let Err(e) = stock_sync::cleanup_old_logs(Path::new(dir))
    {
        tracing::warn!(error = %e, "Initial log cleanup failed");
    }

    let engine = SyncEngine::from_config(&config).context("failed to build catalog clients")?;

    let mut tasks = BackgroundTasks::new();
    let worker = SyncWorker::new(engine, config.sync_interval(), tasks.shutdown_token());
    tasks.spawn("sync_worker", TaskKind::Worker, worker.run());

    if let Some(dir) = &config.log_dir {
        tasks.spawn(
            "log_cleanup",
            TaskKind::Periodic,
            periodic_cleanup(PathBuf::from(dir), tasks.shutdown_token()),
        );
    }
    tasks.log_summary();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    tracing::info!("Ctrl-C received, shutting down");

    tasks.shutdown().await;
    Ok(())
}
