//! Protocol parsers and the format-dispatch registry

pub mod protocols;
pub mod registry;

use thiserror::Error;

use crate::models::ConfigRecord;

pub use protocols::{ShadowsocksParser, TrojanParser, VlessParser, VmessParser};
pub use registry::ParserRegistry;

/// A parse rejection with a human-readable, component-scoped diagnostic.
///
/// The message is surfaced verbatim in import-review UI, so rejection paths
/// say *which* component failed validation (scheme, host, port, credential,
/// transport type) instead of a generic "parse error". Messages are a
/// semi-public contract; change them deliberately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(pub String);

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        ParseError(message.into())
    }
}

/// Outcome of parsing one URI: a fully validated record or a diagnostic.
pub type ParseOutcome = Result<ConfigRecord, ParseError>;

/// Contract every protocol parser implements.
///
/// `recognizes` is a cheap, side-effect-free scheme check; only `parse`
/// does the full work. Parsers never panic on malformed input.
pub trait ProtocolParser: Send + Sync {
    /// Stable lowercase tag for this parser's wire format.
    fn protocol_name(&self) -> &'static str;

    /// Case-insensitive scheme check after trimming surrounding whitespace.
    fn recognizes(&self, uri: &str) -> bool;

    /// Full parse. Trims first; rejects wrong scheme, empty payloads and
    /// missing/empty required components, each with a distinct message.
    fn parse(&self, uri: &str) -> ParseOutcome;
}
