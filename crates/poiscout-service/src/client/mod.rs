//! HTTP client for an Overpass API interpreter endpoint.

mod query;

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::PoiError;
use crate::types::{OverpassElement, OverpassResponse};

pub(crate) use query::{name_search_query, nearby_query};

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

const BODY_PREVIEW_CHARS: usize = 160;

/// Client for one Overpass interpreter endpoint.
///
/// Sends query text as the POST body and maps HTTP outcomes onto
/// [`PoiError`]: 429 becomes [`PoiError::RateLimited`], every other failure
/// (non-2xx, transport, timeout) becomes [`PoiError::Network`], and an
/// undecodable body becomes [`PoiError::Parse`]. No retries happen here.
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
}

impl OverpassClient {
    /// Creates a client with the given per-request timeout and `User-Agent`.
    ///
    /// The timeout covers the whole exchange; when it fires the in-flight
    /// request is dropped and reported as a timed-out [`PoiError::Network`].
    ///
    /// # Errors
    ///
    /// - [`PoiError::InvalidRequest`] if `endpoint` is not an absolute URL.
    /// - [`PoiError::Client`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(endpoint: &str, timeout: Duration, user_agent: &str) -> Result<Self, PoiError> {
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| PoiError::invalid(format!("invalid Overpass endpoint '{endpoint}': {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()
            .map_err(PoiError::Client)?;
        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Runs `query` and returns the decoded elements.
    ///
    /// Individual malformed elements are skipped; only a body that is not an
    /// Overpass JSON document fails the call.
    ///
    /// # Errors
    ///
    /// - [`PoiError::RateLimited`] on HTTP 429.
    /// - [`PoiError::Network`] on any other non-2xx status, a transport
    ///   failure, a timeout, or an Overpass runtime remark with no elements.
    /// - [`PoiError::Parse`] if the body is not a JSON object with `elements`.
    pub async fn fetch_elements(&self, query: &str) -> Result<Vec<OverpassElement>, PoiError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            query_bytes = query.len(),
            "sending Overpass query"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(query.to_owned())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        let decoded: OverpassResponse =
            serde_json::from_slice(&body).map_err(|e| PoiError::Parse {
                context: format!("Overpass response from {}", self.endpoint),
                source: e,
            })?;

        if decoded.elements.is_empty() {
            if let Some(remark) = decoded.remark.as_deref() {
                return Err(PoiError::Network {
                    message: format!("Overpass remark: {remark}"),
                    timed_out: remark.contains("timed out"),
                });
            }
        }

        Ok(decoded.into_elements())
    }
}

fn map_transport_error(error: reqwest::Error) -> PoiError {
    PoiError::Network {
        timed_out: error.is_timeout(),
        message: error.to_string(),
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PoiError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return PoiError::RateLimited {
            status: status.as_u16(),
        };
    }

    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {preview}", status.as_u16())
    };
    PoiError::Network {
        message,
        timed_out: matches!(
            status,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT
        ),
    }
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(BODY_PREVIEW_CHARS).collect::<String>();
    if compact.chars().count() > BODY_PREVIEW_CHARS {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
