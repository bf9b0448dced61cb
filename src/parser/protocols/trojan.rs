use std::collections::HashSet;

use lazy_static::lazy_static;
use url::form_urlencoded;

use crate::models::{ConfigRecord, ParamMap, ParamValue, Protocol};
use crate::parser::protocols::{
    has_scheme, parse_port, split_fragment, split_host_port, strip_scheme,
};
use crate::parser::{ParseError, ParseOutcome, ProtocolParser};
use crate::utils::url::url_decode;

const SCHEME: &str = "trojan://";

// Transport kinds the connection engine can act on. Anything else is a
// hard failure rather than a silently accepted dead record.
lazy_static! {
    static ref TRANSPORT_KINDS: HashSet<&'static str> = {
        let mut kinds = HashSet::new();
        kinds.insert("tcp");
        kinds.insert("ws");
        kinds.insert("grpc");
        kinds.insert("h2");
        kinds
    };
}

const TLS_PARAM_KEYS: &[&str] = &["security", "sni", "fingerprint", "alpn", "allowInsecure"];
const TRANSPORT_PARAM_KEYS: &[&str] = &["type", "path", "host"];

/// Parser for `trojan://password@host:port[?query][#remark]` links.
pub struct TrojanParser;

impl ProtocolParser for TrojanParser {
    fn protocol_name(&self) -> &'static str {
        "trojan"
    }

    fn recognizes(&self, uri: &str) -> bool {
        has_scheme(uri, SCHEME)
    }

    fn parse(&self, uri: &str) -> ParseOutcome {
        parse_credential_uri(uri, SCHEME, Protocol::Trojan, "password")
    }
}

/// Shared grammar for the URI-with-query-parameter form:
/// `scheme://credential@host:port[?query][#remark]`.
///
/// Trojan carries a password as the credential, VLESS a user UUID; the
/// query classification and host handling are otherwise identical. The
/// splitting is done by hand instead of through `url::Url` so that an
/// unterminated IPv6 bracket keeps its own diagnostic instead of folding
/// into a generic host-parse error.
pub(crate) fn parse_credential_uri(
    uri: &str,
    scheme: &str,
    protocol: Protocol,
    credential_label: &str,
) -> ParseOutcome {
    let uri = uri.trim();
    let content = strip_scheme(uri, scheme)
        .ok_or_else(|| ParseError::new(format!("not a {} URI", scheme)))?;
    if content.is_empty() {
        return Err(ParseError::new(format!(
            "{} URI has an empty payload",
            scheme
        )));
    }

    let (content, remark) = split_fragment(content);
    let (main, query) = match content.find('?') {
        Some(pos) => (&content[..pos], Some(&content[pos + 1..])),
        None => (content, None),
    };

    let at = main.rfind('@').ok_or_else(|| {
        ParseError::new(format!(
            "missing '@' between {} and server address",
            credential_label
        ))
    })?;
    let credential = url_decode(&main[..at]);
    if credential.is_empty() {
        return Err(ParseError::new(format!("{} is empty", credential_label)));
    }
    let (host, port_raw) = split_host_port(&main[at + 1..])?;
    let port = parse_port(port_raw)?;

    let mut tls = ParamMap::new();
    let mut transport = ParamMap::new();
    let mut additional = ParamMap::new();

    if let Some(query) = query {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let key = key.into_owned();
            let value = value.into_owned();
            if key == "allowInsecure" {
                tls.insert("allowInsecure".to_string(), parse_insecure_flag(&value)?);
            } else if TLS_PARAM_KEYS.contains(&key.as_str()) {
                tls.insert(key, ParamValue::Str(value));
            } else if key == "type" {
                if !TRANSPORT_KINDS.contains(value.as_str()) {
                    return Err(ParseError::new(format!(
                        "unsupported transport type '{}'",
                        value
                    )));
                }
                transport.insert(key, ParamValue::Str(value));
            } else if TRANSPORT_PARAM_KEYS.contains(&key.as_str()) {
                transport.insert(key, ParamValue::Str(value));
            } else {
                additional.insert(key, ParamValue::Str(value));
            }
        }
    }

    Ok(ConfigRecord {
        protocol,
        server_address: host,
        port,
        identity: credential,
        secondary_identity: None,
        remark,
        tls_settings: if tls.is_empty() { None } else { Some(tls) },
        transport_settings: if transport.is_empty() {
            None
        } else {
            Some(transport)
        },
        additional_params: if additional.is_empty() {
            None
        } else {
            Some(additional)
        },
    })
}

fn parse_insecure_flag(value: &str) -> Result<ParamValue, ParseError> {
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Ok(ParamValue::Bool(true))
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Ok(ParamValue::Bool(false))
    } else {
        Err(ParseError::new(format!(
            "allowInsecure value '{}' is not a boolean",
            value
        )))
    }
}
