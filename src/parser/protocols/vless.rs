use crate::models::Protocol;
use crate::parser::protocols::has_scheme;
use crate::parser::protocols::trojan::parse_credential_uri;
use crate::parser::{ParseOutcome, ProtocolParser};

const SCHEME: &str = "vless://";

/// Parser for `vless://uuid@host:port[?query][#remark]` links.
///
/// Same grammar as Trojan with a user UUID in the credential position; the
/// UUID is carried as opaque text, the connection engine owns its
/// interpretation.
pub struct VlessParser;

impl ProtocolParser for VlessParser {
    fn protocol_name(&self) -> &'static str {
        "vless"
    }

    fn recognizes(&self, uri: &str) -> bool {
        has_scheme(uri, SCHEME)
    }

    fn parse(&self, uri: &str) -> ParseOutcome {
        parse_credential_uri(uri, SCHEME, Protocol::Vless, "user id")
    }
}
