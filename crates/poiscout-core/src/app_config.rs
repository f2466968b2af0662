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

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Overpass interpreter endpoint that receives the query body.
    pub overpass_url: String,
    pub request_timeout_secs: u64,
    /// Minimum spacing between two outbound backend requests.
    pub min_request_interval_ms: u64,
    pub cache_ttl_secs: u64,
    pub cache_sweep_secs: u64,
    /// Value of the `[timeout:N]` directive embedded in query text.
    pub query_timeout_secs: u32,
    pub user_agent: String,
}
