pub mod identity;
pub mod models;
pub mod parser;
pub mod subscription;
pub mod utils;

// Re-export the main record and result types for easier access
pub use models::{
    ConfigRecord, ImportSource, ImportedConfigEntry, LineError, ParamMap, ParamValue, Protocol,
    SubscriptionParseResult,
};

// Re-export the parsing entry points
pub use parser::{ParseError, ParseOutcome, ParserRegistry, ProtocolParser};
pub use subscription::{
    import_subscription, import_subscription_sync, import_uri, parse_subscription_body, parse_uri,
    FetchCause, SubscriptionError,
};
