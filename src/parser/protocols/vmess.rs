use serde_json::{Map, Value};

use crate::models::{ConfigRecord, ParamMap, ParamValue, Protocol};
use crate::parser::protocols::{has_scheme, parse_port, strip_scheme};
use crate::parser::{ParseError, ParseOutcome, ProtocolParser};
use crate::utils::base64::base64_decode_flexible;

const SCHEME: &str = "vmess://";

// Alias lists for each logical field, first present-and-non-empty wins.
// Kept next to each other so the whole alias surface is visible in one
// place instead of scattered through the extraction code.
const ADDRESS_KEYS: &[&str] = &["add", "address", "server"];
const PORT_KEYS: &[&str] = &["port"];
const USER_ID_KEYS: &[&str] = &["id", "uuid"];
const REMARK_KEYS: &[&str] = &["ps", "remark"];
const NETWORK_KEYS: &[&str] = &["net", "network"];
const TLS_KEYS: &[&str] = &["tls", "security"];
const ALTER_ID_KEYS: &[&str] = &["aid", "alterId"];

/// Parser for `vmess://` links: the payload after the scheme is Base64
/// (either alphabet, padding optional) of a JSON object describing the
/// server. Key names vary between the client apps that mint these links,
/// hence the alias lists above.
pub struct VmessParser;

impl ProtocolParser for VmessParser {
    fn protocol_name(&self) -> &'static str {
        "vmess"
    }

    fn recognizes(&self, uri: &str) -> bool {
        has_scheme(uri, SCHEME)
    }

    fn parse(&self, uri: &str) -> ParseOutcome {
        let uri = uri.trim();
        let payload =
            strip_scheme(uri, SCHEME).ok_or_else(|| ParseError::new("not a vmess:// URI"))?;
        if payload.is_empty() {
            return Err(ParseError::new("vmess:// URI has an empty payload"));
        }

        let decoded = base64_decode_flexible(payload)
            .ok_or_else(|| ParseError::new("vmess payload is not valid base64"))?;
        let json: Value = serde_json::from_str(&decoded)
            .map_err(|_| ParseError::new("vmess payload is not valid JSON"))?;
        let obj = json
            .as_object()
            .ok_or_else(|| ParseError::new("vmess payload must be an object"))?;

        let address = resolve_str(obj, ADDRESS_KEYS)
            .ok_or_else(|| ParseError::new("server address is missing or empty"))?;
        let port_raw = resolve_number_or_string(obj, PORT_KEYS)
            .ok_or_else(|| ParseError::new("port is missing"))?;
        let port = parse_port(&port_raw)?;
        let user_id = resolve_str(obj, USER_ID_KEYS)
            .ok_or_else(|| ParseError::new("user id is missing or empty"))?;

        let remark = resolve_str(obj, REMARK_KEYS);
        let network = resolve_str(obj, NETWORK_KEYS).unwrap_or_else(|| "tcp".to_string());
        let header_type = resolve_str(obj, &["type"]).unwrap_or_else(|| "none".to_string());
        let mut host = resolve_str(obj, &["host"]);
        let mut path = resolve_str(obj, &["path"]);
        let version = resolve_number_or_string(obj, &["v"]);

        // Version-1 links packed "host;path" into the host field; links
        // stamped v=2 may still carry that packing from re-encoders.
        if version.as_deref() == Some("2") {
            if let Some(packed) = host.clone() {
                if let Some(semicolon) = packed.find(';') {
                    let head = packed[..semicolon].to_string();
                    path = Some(packed[semicolon + 1..].to_string()).filter(|p| !p.is_empty());
                    host = Some(head).filter(|h| !h.is_empty());
                }
            }
        }

        let mut transport = ParamMap::new();
        transport.insert("network".to_string(), ParamValue::Str(network.clone()));
        transport.insert("type".to_string(), ParamValue::Str(header_type.clone()));
        let promote_host = matches!(network.as_str(), "ws" | "h2")
            || (network == "tcp" && header_type == "http");
        let promote_path = promote_host || network == "grpc";
        if promote_host {
            if let Some(host) = host {
                transport.insert("host".to_string(), ParamValue::Str(host));
            }
        }
        if promote_path {
            if let Some(path) = path {
                transport.insert("path".to_string(), ParamValue::Str(path));
            }
        }

        // No TLS field at all means no TLS block, not an empty one.
        let tls_settings = resolve_str(obj, TLS_KEYS).map(|security| {
            let mut tls = ParamMap::new();
            tls.insert("security".to_string(), ParamValue::Str(security));
            if let Some(sni) = resolve_str(obj, &["sni"]) {
                tls.insert("sni".to_string(), ParamValue::Str(sni));
            }
            tls
        });

        let alter_id_raw =
            resolve_number_or_string(obj, ALTER_ID_KEYS).unwrap_or_else(|| "0".to_string());
        let alter_id: u64 = alter_id_raw
            .parse()
            .map_err(|_| ParseError::new(format!("alterId '{}' is not a number", alter_id_raw)))?;

        let mut additional = ParamMap::new();
        additional.insert("alterId".to_string(), ParamValue::Int(alter_id));
        if let Some(version) = version {
            additional.insert("v".to_string(), ParamValue::Str(version));
        }

        Ok(ConfigRecord {
            protocol: Protocol::Vmess,
            server_address: address,
            port,
            identity: user_id,
            secondary_identity: None,
            remark,
            tls_settings,
            transport_settings: Some(transport),
            additional_params: Some(additional),
        })
    }
}

/// First key in `keys` whose value is a non-empty string.
fn resolve_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = obj.get(*key).and_then(Value::as_str) {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

/// First key in `keys` holding a number or a non-empty string, normalized
/// to its string form. Fields like `port` and `aid` appear both ways in
/// the wild.
fn resolve_number_or_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match obj.get(*key) {
            Some(Value::Number(n)) => return Some(n.to_string()),
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            _ => {}
        }
    }
    None
}
