use std::collections::HashSet;

use lazy_static::lazy_static;
use url::form_urlencoded;

use crate::models::{ConfigRecord, ParamMap, ParamValue, Protocol};
use crate::parser::protocols::{
    has_scheme, parse_port, split_fragment, split_host_port, strip_scheme,
};
use crate::parser::{ParseError, ParseOutcome, ProtocolParser};
use crate::utils::base64::{base64_decode_flexible, base64_encode};

const SCHEME: &str = "ss://";

// AEAD ciphers an engine can actually act on. Anything else is rejected
// here: an unsupported method handed downstream fails opaquely at connect
// time instead.
lazy_static! {
    static ref SUPPORTED_METHODS: HashSet<&'static str> = {
        let mut methods = HashSet::new();
        methods.insert("aes-128-gcm");
        methods.insert("aes-192-gcm");
        methods.insert("aes-256-gcm");
        methods.insert("chacha20-ietf-poly1305");
        methods.insert("xchacha20-ietf-poly1305");
        methods.insert("2022-blake3-aes-128-gcm");
        methods.insert("2022-blake3-aes-256-gcm");
        methods.insert("2022-blake3-chacha20-poly1305");
        methods
    };
}

/// Parser for `ss://` links in their three historical sub-formats:
///
/// 1. SIP002: `ss://base64(method:password)@host:port[/?query][#remark]`
/// 2. Standard: SIP002 without the query segment
/// 3. Legacy: `ss://base64(method:password@host:port)[#remark]`
///
/// An `@` in the raw (pre-decode) content selects SIP002/standard; otherwise
/// the whole payload is decoded and split as legacy. Legacy password
/// material may itself contain `@`, so the credential/authority split takes
/// the *last* `@`, while `method:password` splits on the *first* colon
/// because passwords may legally contain colons.
pub struct ShadowsocksParser;

impl ProtocolParser for ShadowsocksParser {
    fn protocol_name(&self) -> &'static str {
        "shadowsocks"
    }

    fn recognizes(&self, uri: &str) -> bool {
        has_scheme(uri, SCHEME)
    }

    fn parse(&self, uri: &str) -> ParseOutcome {
        let uri = uri.trim();
        let content =
            strip_scheme(uri, SCHEME).ok_or_else(|| ParseError::new("not an ss:// URI"))?;
        if content.is_empty() {
            return Err(ParseError::new("ss:// URI has an empty payload"));
        }

        let (content, remark) = split_fragment(content);
        // Some emitters write "/?plugin=..."; normalize before the query split.
        let content = content.replace("/?", "?");
        let (main, query) = match content.find('?') {
            Some(pos) => (&content[..pos], Some(&content[pos + 1..])),
            None => (content.as_str(), None),
        };
        if main.is_empty() {
            return Err(ParseError::new("ss:// URI has an empty payload"));
        }

        // Query parameters (plugin and friends) ride along unmodeled.
        let mut additional = ParamMap::new();
        if let Some(query) = query {
            for (key, value) in form_urlencoded::parse(query.as_bytes()) {
                additional.insert(key.into_owned(), ParamValue::Str(value.into_owned()));
            }
        }

        let (method, password, host, port) = if let Some(at) = main.rfind('@') {
            // SIP002 / standard: only the userinfo is encoded.
            let userinfo = &main[..at];
            if userinfo.is_empty() {
                return Err(ParseError::new("missing credentials before '@'"));
            }
            let decoded = base64_decode_flexible(userinfo)
                .ok_or_else(|| ParseError::new("credentials are not valid base64"))?;
            let (method, password) = split_method_password(&decoded)?;
            let (host, port_raw) = split_host_port(&main[at + 1..])?;
            (method, password, host, parse_port(port_raw)?)
        } else {
            // Legacy: the entire authority is inside the encoded payload.
            let decoded = base64_decode_flexible(main)
                .ok_or_else(|| ParseError::new("payload is not valid base64"))?;
            let at = decoded.rfind('@').ok_or_else(|| {
                ParseError::new("decoded payload is missing '@' between credentials and server")
            })?;
            let (method, password) = split_method_password(&decoded[..at])?;
            let (host, port_raw) = split_host_port(&decoded[at + 1..])?;
            (method, password, host, parse_port(port_raw)?)
        };

        if !SUPPORTED_METHODS.contains(method.as_str()) {
            return Err(ParseError::new(format!(
                "Unsupported encryption method '{}'",
                method
            )));
        }
        if password.is_empty() {
            return Err(ParseError::new("password is empty"));
        }

        Ok(ConfigRecord {
            protocol: Protocol::Shadowsocks,
            server_address: host,
            port,
            identity: method,
            secondary_identity: Some(password),
            remark,
            tls_settings: None,
            transport_settings: None,
            additional_params: if additional.is_empty() {
                None
            } else {
                Some(additional)
            },
        })
    }
}

fn split_method_password(decoded: &str) -> Result<(String, String), ParseError> {
    let colon = decoded.find(':').ok_or_else(|| {
        ParseError::new("credentials are missing ':' between method and password")
    })?;
    let method = decoded[..colon].to_string();
    if method.is_empty() {
        return Err(ParseError::new("encryption method is empty"));
    }
    Ok((method, decoded[colon + 1..].to_string()))
}

/// Builds a standard (query-less SIP002) `ss://` URI from its parts, the
/// inverse of the parser for collaborators that re-export single configs.
pub fn build_standard_uri(method: &str, password: &str, host: &str, port: u16) -> String {
    let userinfo = base64_encode(&format!("{}:{}", method, password));
    if host.contains(':') {
        format!("ss://{}@[{}]:{}", userinfo, host, port)
    } else {
        format!("ss://{}@{}:{}", userinfo, host, port)
    }
}
