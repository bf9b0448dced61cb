//! One parser per wire format, plus the string-splitting helpers they share

mod ss;
mod trojan;
mod vless;
mod vmess;

pub use ss::{build_standard_uri, ShadowsocksParser};
pub use trojan::TrojanParser;
pub use vless::VlessParser;
pub use vmess::VmessParser;

use crate::parser::ParseError;
use crate::utils::url::url_decode;

/// Case-insensitive scheme-prefix check on a trimmed URI. Cheap by design;
/// `recognizes` implementations must not attempt a full parse.
pub(crate) fn has_scheme(uri: &str, scheme: &str) -> bool {
    strip_scheme(uri.trim(), scheme).is_some()
}

/// Strips a scheme prefix case-insensitively, returning the payload.
pub(crate) fn strip_scheme<'a>(uri: &'a str, scheme: &str) -> Option<&'a str> {
    let bytes = uri.as_bytes();
    if bytes.len() >= scheme.len() && bytes[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
    {
        Some(&uri[scheme.len()..])
    } else {
        None
    }
}

/// Splits off the `#fragment` suffix and percent-decodes it as the remark.
/// An absent or empty fragment yields `None`, never an empty string.
pub(crate) fn split_fragment(content: &str) -> (&str, Option<String>) {
    match content.find('#') {
        Some(pos) => {
            let remark = url_decode(&content[pos + 1..]);
            let remark = if remark.is_empty() { None } else { Some(remark) };
            (&content[..pos], remark)
        }
        None => (content, None),
    }
}

/// Splits `host:port` or `[v6-literal]:port`, stripping the brackets.
///
/// An opening bracket without its closing bracket is its own failure, not a
/// generic host error, because the import UI points users at it.
pub(crate) fn split_host_port(authority: &str) -> Result<(String, &str), ParseError> {
    if let Some(rest) = authority.strip_prefix('[') {
        let close = rest
            .find(']')
            .ok_or_else(|| ParseError::new("IPv6 server address is missing closing bracket"))?;
        let host = &rest[..close];
        if host.is_empty() {
            return Err(ParseError::new("server address is empty"));
        }
        let port = rest[close + 1..]
            .strip_prefix(':')
            .ok_or_else(|| ParseError::new("missing port after IPv6 server address"))?;
        Ok((host.to_string(), port))
    } else {
        let colon = authority
            .rfind(':')
            .ok_or_else(|| ParseError::new("missing port in server authority"))?;
        let host = &authority[..colon];
        if host.is_empty() {
            return Err(ParseError::new("server address is empty"));
        }
        Ok((host.to_string(), &authority[colon + 1..]))
    }
}

/// Validates a port string into the 1-65535 range. Out-of-range and
/// non-numeric values are failures, never clamped or defaulted.
pub(crate) fn parse_port(raw: &str) -> Result<u16, ParseError> {
    let value: u64 = raw
        .parse()
        .map_err(|_| ParseError::new(format!("port '{}' is not a number", raw)))?;
    if !(1..=65535).contains(&value) {
        return Err(ParseError::new(format!(
            "port {} is out of range 1-65535",
            value
        )));
    }
    Ok(value as u16)
}
