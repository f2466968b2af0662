use thiserror::Error;

/// Errors surfaced by the POI service and its Overpass client.
///
/// `Search` and `Fetch` wrap the underlying cause so callers can tell which
/// operation failed and still inspect the root kind via [`PoiError::root_cause`].
#[derive(Debug, Error)]
pub enum PoiError {
    #[error("rate limited by POI backend (HTTP {status})")]
    RateLimited { status: u16 },

    #[error("network error talking to POI backend: {message}")]
    Network { message: String, timed_out: bool },

    #[error("could not decode {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("POI search failed: {source}")]
    Search {
        #[source]
        source: Box<PoiError>,
    },

    #[error("failed to fetch nearby POIs: {source}")]
    Fetch {
        #[source]
        source: Box<PoiError>,
    },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl PoiError {
    /// Stable machine-readable code for this failure kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            PoiError::RateLimited { .. } => "RATE_LIMIT_ERROR",
            PoiError::Network { .. } => "NETWORK_ERROR",
            PoiError::Parse { .. } => "PARSE_ERROR",
            PoiError::Search { .. } => "SEARCH_ERROR",
            PoiError::Fetch { .. } => "FETCH_ERROR",
            PoiError::InvalidRequest { .. } => "INVALID_REQUEST",
            PoiError::Client(_) => "CLIENT_ERROR",
        }
    }

    /// Follows `Search` / `Fetch` wrappers down to the originating error.
    #[must_use]
    pub fn root_cause(&self) -> &PoiError {
        match self {
            PoiError::Search { source } | PoiError::Fetch { source } => source.root_cause(),
            other => other,
        }
    }

    /// `true` when a later retry could plausibly succeed.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.root_cause(),
            PoiError::RateLimited { .. } | PoiError::Network { .. }
        )
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PoiError::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub(crate) fn into_search(self) -> Self {
        PoiError::Search {
            source: Box::new(self),
        }
    }

    pub(crate) fn into_fetch(self) -> Self {
        PoiError::Fetch {
            source: Box::new(self),
        }
    }
}
