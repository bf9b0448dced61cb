//! HTTP fetch collaborator for subscription bodies
//!
//! One GET per subscription URL, bounded by a caller-supplied timeout.
//! Retry policy deliberately lives with the caller, not here.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use url::Url;

use crate::subscription::{FetchCause, SubscriptionError};

const DEFAULT_USER_AGENT: &str = "subimport";

/// Fetches a subscription body.
///
/// The URL is validated before any network I/O; a non-2xx response
/// surfaces as `HttpStatus` carrying the code, and transport failures
/// surface as `Network` with a stable cause tag instead of hanging past
/// the timeout.
pub async fn fetch_body(url: &str, timeout: Duration) -> Result<String, SubscriptionError> {
    let parsed = Url::parse(url).map_err(|e| SubscriptionError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(SubscriptionError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", other),
            })
        }
    }

    let client = Client::builder()
        .timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|e| SubscriptionError::Network {
            url: url.to_string(),
            cause: FetchCause::Connection,
            detail: format!("failed to build HTTP client: {}", e),
        })?;

    debug!("fetching subscription from {}", url);
    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SubscriptionError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

fn classify_error(url: &str, err: reqwest::Error) -> SubscriptionError {
    let cause = if err.is_timeout() {
        FetchCause::Timeout
    } else if err.is_connect() {
        FetchCause::Connection
    } else {
        // Neither timed out nor failed to connect: the request was torn
        // down mid-flight.
        FetchCause::Cancelled
    };
    SubscriptionError::Network {
        url: url.to_string(),
        cause,
        detail: err.to_string(),
    }
}
