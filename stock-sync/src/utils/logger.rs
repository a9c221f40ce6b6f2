//! Logging Infrastructure
//!
//! Structured logging setup for development and production:
//! - Console output, pretty or JSON
//! - Daily rotating application logs (deleted after 14 days)
//! - Permanent audit logs of every catalog write (never deleted)

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Days an application log file is kept
const APP_LOG_RETENTION_DAYS: i64 = 14;

/// Clean up application log files older than the retention window
///
/// Audit logs are left alone.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // app.YYYY-MM-DD.log
        if let Some(date_part) = name
            .strip_prefix("app.")
            .and_then(|d| d.strip_suffix(".log"))
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

fn daily_appender(dir: &Path, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)?)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level or filter directive (e.g., "info", "stock_sync=debug")
/// * `json_format` - JSON output (production) instead of pretty output (development)
/// * `log_dir` - Optional directory for file logging; `app/` and `audit/` are created below it
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .try_init()?;
        return Ok(());
    };

    let log_dir = Path::new(dir);
    let app_log_dir = log_dir.join("app");
    let audit_log_dir = log_dir.join("audit");
    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&audit_log_dir)?;

    // Everything except audit records, rotated daily, subject to cleanup
    let app_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::sync::Mutex::new(daily_appender(&app_log_dir, "app")?))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() != "audit"
        }));

    // Audit records only, kept forever
    let audit_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::sync::Mutex::new(daily_appender(&audit_log_dir, "audit")?))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() == "audit"
        }));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(app_layer)
        .with(audit_layer)
        .try_init()?;

    Ok(())
}

/// Initialize console-only logging
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Periodic cleanup task - runs every hour until shutdown
pub async fn periodic_cleanup(log_dir: PathBuf, shutdown: tokio_util::sync::CancellationToken) {
    use tokio::time::{Duration, sleep};

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = sleep(Duration::from_secs(3600)) => {}
        }

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

/// Audit log helper - records every write made to the target catalog
///
/// Audit records go to `audit/audit.YYYY-MM-DD.log` and are never deleted.
///
/// ```ignore
/// audit_log!("replace_product", "product:42");
/// audit_log!("replace_product", "product:42", r#"[{"variant_id":"9","quantity":"7"}]"#);
/// ```
#[macro_export]
macro_rules! audit_log {
    ($action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            action = %$action,
            resource = %$resource,
            timestamp = %chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            action = %$action,
            resource = %$resource,
            details = %$details,
            timestamp = %chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}
