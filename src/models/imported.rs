use serde::{Deserialize, Serialize};

use super::ConfigRecord;
use crate::identity;

/// Where an imported config entered the application from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportSource {
    ManualUri,
    SubscriptionUrl,
    QrCode,
    Clipboard,
}

/// A parsed config wrapped with import metadata.
///
/// `id` is a pure function of the normalized raw URI text, so re-importing
/// the same URI (for example re-fetching an unchanged subscription) yields
/// the same id and the storage layer can dedup without knowing how parsing
/// works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedConfigEntry {
    pub id: String,
    pub source: ImportSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_url: Option<String>,
    pub name: String,
    pub record: ConfigRecord,
}

impl ImportedConfigEntry {
    pub fn new(
        raw_uri: &str,
        record: ConfigRecord,
        source: ImportSource,
        subscription_url: Option<String>,
    ) -> Self {
        let id = identity::config_id(raw_uri);
        let name = record
            .remark
            .clone()
            .unwrap_or_else(|| format!("{} {}", record.protocol, record.server_address));
        ImportedConfigEntry {
            id,
            source,
            subscription_url,
            name,
            record,
        }
    }
}

/// One rejected subscription line, kept alongside the successes so the
/// import-review UI can show exactly what failed and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineError {
    /// 1-based position in the decoded subscription body.
    pub line_number: usize,
    pub raw_uri: String,
    pub message: String,
}

/// Aggregate outcome of one subscription fetch.
///
/// Both lists preserve original line order for reproducible diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionParseResult {
    pub configs: Vec<ImportedConfigEntry>,
    pub errors: Vec<LineError>,
}

impl SubscriptionParseResult {
    /// Every line parsed and at least one config came out.
    pub fn is_full_success(&self) -> bool {
        self.errors.is_empty() && !self.configs.is_empty()
    }

    /// Some lines parsed, some were rejected.
    pub fn is_partial_success(&self) -> bool {
        !self.errors.is_empty() && !self.configs.is_empty()
    }

    /// Nothing could be imported. The fetch and decode themselves still
    /// succeeded, which is why this is a result state and not an error.
    pub fn is_failure(&self) -> bool {
        self.configs.is_empty()
    }
}
