#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings read from `SHOPFEED_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the catalog service that receives imports.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub api_timeout_secs: u64,
    pub render_wait_secs: u64,
    pub render_settle_ms: u64,
    pub page_delay_ms: u64,
    pub page_delay_jitter_ms: u64,
    pub api_result_limit: usize,
    pub import_batch_size: usize,
    pub import_timeout_secs: u64,
}
