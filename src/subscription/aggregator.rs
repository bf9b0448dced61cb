//! Subscription aggregation: fetch, decode, dispatch, collect
//!
//! The aggregator is where per-line recovery happens: a malformed line
//! lands in the error list and processing continues. Only fetch and
//! decode failures abort a whole import.

use std::time::Duration;

use log::{debug, info};

use crate::models::{ImportSource, ImportedConfigEntry, LineError, SubscriptionParseResult};
use crate::parser::{ParseError, ParseOutcome, ParserRegistry};
use crate::subscription::{decoder, fetch, FetchCause, SubscriptionError};

/// Parses one URI through the registry. Entry point for manual paste and
/// QR-scan flows that bypass the subscription pipeline.
pub fn parse_uri(uri: &str) -> ParseOutcome {
    ParserRegistry::new().dispatch(uri)
}

/// Parses one URI and wraps it with import metadata.
pub fn import_uri(uri: &str, source: ImportSource) -> Result<ImportedConfigEntry, ParseError> {
    let record = parse_uri(uri)?;
    Ok(ImportedConfigEntry::new(uri.trim(), record, source, None))
}

/// Decodes a fetched subscription body and dispatches every line.
///
/// Returns `Ok` with an all-errors result when every line is invalid;
/// only an undecodable body is an `Err`. That distinction lets callers
/// tell "the subscription served garbage" from "the subscription served
/// entries we could not use".
pub fn parse_subscription_body(
    body: &str,
    subscription_url: &str,
) -> Result<SubscriptionParseResult, SubscriptionError> {
    let lines = decoder::decode_body(body)?;
    let registry = ParserRegistry::new();

    let mut configs = Vec::new();
    let mut errors = Vec::new();
    for (line_number, raw_uri) in lines {
        match registry.dispatch(&raw_uri) {
            Ok(record) => {
                configs.push(ImportedConfigEntry::new(
                    &raw_uri,
                    record,
                    ImportSource::SubscriptionUrl,
                    Some(subscription_url.to_string()),
                ));
            }
            Err(err) => {
                debug!(
                    "subscription line {} rejected: {}",
                    line_number, err
                );
                errors.push(LineError {
                    line_number,
                    raw_uri,
                    message: err.to_string(),
                });
            }
        }
    }

    info!(
        "subscription '{}': {} configs imported, {} lines rejected",
        subscription_url,
        configs.len(),
        errors.len()
    );
    Ok(SubscriptionParseResult { configs, errors })
}

/// Full pipeline for one subscription URL: fetch, decode, dispatch.
pub async fn import_subscription(
    url: &str,
    timeout: Duration,
) -> Result<SubscriptionParseResult, SubscriptionError> {
    let body = fetch::fetch_body(url, timeout).await?;
    parse_subscription_body(&body, url)
}

/// Blocking wrapper around [`import_subscription`] for callers without a
/// runtime of their own.
pub fn import_subscription_sync(
    url: &str,
    timeout: Duration,
) -> Result<SubscriptionParseResult, SubscriptionError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SubscriptionError::Network {
            url: url.to_string(),
            cause: FetchCause::Connection,
            detail: format!("failed to create async runtime: {}", e),
        })?;
    rt.block_on(import_subscription(url, timeout))
}
