//! Client configuration

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default number of target products requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Related resources the target listing must inline for variant matching
pub const DEFAULT_JOIN: &str = "Variations.Props,Variants.VariationProps";

/// Source catalog connection settings
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Full URL of the catalog read (e.g., "https://erp.example.com/api/products")
    pub url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl SourceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

/// Target catalog connection settings
#[derive(Debug, Clone)]
pub struct TargetConfig {
    /// API base URL (e.g., "https://api.storefront.example/api/v1")
    pub base_url: String,

    /// Sent as the `Api-Key` header on every call
    pub api_key: String,

    /// Products per listing page
    pub page_size: u32,

    /// Value of the `join` listing parameter
    pub join: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl TargetConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            page_size: DEFAULT_PAGE_SIZE,
            join: DEFAULT_JOIN.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the listing page size (at least one)
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the inlined related resources
    pub fn with_join(mut self, join: impl Into<String>) -> Self {
        self.join = join.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
