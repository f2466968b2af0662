use std::time::Duration;

use poiscout_core::AppConfig;

use crate::client::DEFAULT_OVERPASS_URL;
use crate::rate_limit::DEFAULT_MIN_REQUEST_INTERVAL;

/// Settings for one [`crate::PoiService`] instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiServiceConfig {
    pub endpoint: String,
    /// Whole-request timeout; the request is cancelled when it elapses.
    pub request_timeout: Duration,
    pub min_request_interval: Duration,
    /// How long a cached result counts as fresh.
    pub cache_ttl: Duration,
    /// `[timeout:N]` directive sent inside the query text.
    pub query_timeout_secs: u32,
    pub user_agent: String,
}

impl Default for PoiServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OVERPASS_URL.to_owned(),
            request_timeout: Duration::from_secs(10),
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            cache_ttl: Duration::from_secs(15 * 60),
            query_timeout_secs: 25,
            user_agent: "poiscout/0.1 (poi-aggregation)".to_owned(),
        }
    }
}

impl PoiServiceConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            endpoint: config.overpass_url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            min_request_interval: Duration::from_millis(config.min_request_interval_ms),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            query_timeout_secs: config.query_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}
