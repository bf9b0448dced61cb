use crate::parser::protocols::{ShadowsocksParser, TrojanParser, VlessParser, VmessParser};
use crate::parser::{ParseError, ParseOutcome, ProtocolParser};

/// Holds the closed set of protocol parsers and routes a raw URI to the
/// first one whose scheme matches.
///
/// The schemes are disjoint, so order does not affect which parser wins;
/// it is fixed anyway so dispatch is deterministic under test.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn ProtocolParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        ParserRegistry {
            parsers: vec![
                Box::new(ShadowsocksParser),
                Box::new(VmessParser),
                Box::new(VlessParser),
                Box::new(TrojanParser),
            ],
        }
    }

    /// Trims the URI and parses it with the first parser that recognizes
    /// its scheme. An unrecognized scheme is a uniform failure, not a
    /// panic or a silent skip.
    pub fn dispatch(&self, uri: &str) -> ParseOutcome {
        let uri = uri.trim();
        for parser in &self.parsers {
            if parser.recognizes(uri) {
                return parser.parse(uri);
            }
        }
        Err(ParseError::new("no parser recognizes this URI scheme"))
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        ParserRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Protocol;

    #[test]
    fn test_dispatch_routes_by_scheme() {
        let registry = ParserRegistry::new();
        assert_eq!(
            registry
                .dispatch("trojan://secret@example.com:443")
                .unwrap()
                .protocol,
            Protocol::Trojan
        );
        assert_eq!(
            registry
                .dispatch("vless://uuid@example.com:443")
                .unwrap()
                .protocol,
            Protocol::Vless
        );
        assert_eq!(
            registry
                .dispatch("ss://YWVzLTI1Ni1nY206cA==@h:1")
                .unwrap()
                .protocol,
            Protocol::Shadowsocks
        );
    }

    #[test]
    fn test_dispatch_trims_surrounding_whitespace() {
        let registry = ParserRegistry::new();
        let record = registry
            .dispatch("  trojan://secret@example.com:443\r\n")
            .unwrap();
        assert_eq!(record.server_address, "example.com");
    }

    #[test]
    fn test_unknown_scheme_is_a_uniform_failure() {
        let registry = ParserRegistry::new();
        let err = registry.dispatch("wireguard://whatever").unwrap_err();
        assert_eq!(err.to_string(), "no parser recognizes this URI scheme");
        let err = registry.dispatch("plain text").unwrap_err();
        assert_eq!(err.to_string(), "no parser recognizes this URI scheme");
    }

    #[test]
    fn test_parser_names_are_stable() {
        let registry = ParserRegistry::new();
        let names: Vec<&str> = registry.parsers.iter().map(|p| p.protocol_name()).collect();
        assert_eq!(names, vec!["shadowsocks", "vmess", "vless", "trojan"]);
    }
}
