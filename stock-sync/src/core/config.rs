use catalog_client::{SourceConfig, TargetConfig};
use std::time::Duration;
use thiserror::Error;

use crate::reconcile::FieldPolicy;

/// Configuration errors; the only fatal errors of the service
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Service configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | SOURCE_API_URL (or ERP_API_URL) | required | Source catalog URL |
/// | TARGET_API_BASE_URL (or EASY_ORDER_BASE_URL) | required | Target API base URL |
/// | TARGET_API_KEY (or EASY_ORDER_API_KEY) | required | Target API key |
/// | SYNC_INTERVAL_SECS | 20 | Pause between the end of a round and the next |
/// | TARGET_PAGE_SIZE | 20 | Products per target listing page |
/// | TARGET_JOIN | Variations.Props,Variants.VariationProps | Inlined listing resources |
/// | SYNC_FIELDS | all | `all` or `quantity` |
/// | REQUEST_TIMEOUT_SECS | 30 | Per-request timeout |
/// | DRY_RUN | false | Compute and log updates without writing |
/// | LOG_LEVEL | info | Log level / filter |
/// | LOG_JSON | false | JSON log output |
/// | LOG_DIR | unset | Directory for rotating log files |
///
/// # Example
///
/// ```ignore
/// SOURCE_API_URL=https://erp.example.com/api/products \
/// TARGET_API_BASE_URL=https://api.storefront.example/api/v1 \
/// TARGET_API_KEY=... cargo run -p stock-sync
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub source_api_url: String,
    pub target_api_base_url: String,
    pub target_api_key: String,
    pub sync_interval_secs: u64,
    pub page_size: u32,
    pub join: String,
    pub field_policy: FieldPolicy,
    pub request_timeout_secs: u64,
    pub dry_run: bool,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str, fallback: &str| {
            get(key)
                .or_else(|| get(fallback))
                .ok_or(ConfigError::Missing(key))
        };

        let field_policy = match get("SYNC_FIELDS") {
            Some(v) => v.parse().map_err(|reason| ConfigError::Invalid {
                key: "SYNC_FIELDS",
                reason,
            })?,
            None => FieldPolicy::default(),
        };

        Ok(Self {
            source_api_url: required("SOURCE_API_URL", "ERP_API_URL")?,
            target_api_base_url: required("TARGET_API_BASE_URL", "EASY_ORDER_BASE_URL")?,
            target_api_key: required("TARGET_API_KEY", "EASY_ORDER_API_KEY")?,
            sync_interval_secs: get("SYNC_INTERVAL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            page_size: get("TARGET_PAGE_SIZE")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(catalog_client::config::DEFAULT_PAGE_SIZE),
            join: get("TARGET_JOIN")
                .unwrap_or_else(|| catalog_client::config::DEFAULT_JOIN.into()),
            field_policy,
            request_timeout_secs: get("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(catalog_client::config::DEFAULT_TIMEOUT_SECS),
            dry_run: get("DRY_RUN").and_then(|v| v.parse().ok()).unwrap_or(false),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: get("LOG_JSON").and_then(|v| v.parse().ok()).unwrap_or(false),
            log_dir: get("LOG_DIR"),
        })
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig::new(&self.source_api_url).with_timeout(self.request_timeout_secs)
    }

    pub fn target_config(&self) -> TargetConfig {
        TargetConfig::new(&self.target_api_base_url, &self.target_api_key)
            .with_page_size(self.page_size)
            .with_join(&self.join)
            .with_timeout(self.request_timeout_secs)
    }
}
