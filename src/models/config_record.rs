use std::fmt;

use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};

/// Wire formats this crate understands.
///
/// This is the canonical enum used for protocol identification across the
/// crate. The set is closed; new formats get a new variant and a new parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Shadowsocks,
    Vmess,
    Vless,
    Trojan,
}

impl Protocol {
    /// Stable lowercase tag, used in display names and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Shadowsocks => "shadowsocks",
            Protocol::Vmess => "vmess",
            Protocol::Vless => "vless",
            Protocol::Trojan => "trojan",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single settings value carried in one of the parameter maps.
///
/// `Int` exists for numeric passthrough values such as the VMess alterId.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Str(String),
    Bool(bool),
    Int(u64),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(n) => write!(f, "{}", n),
        }
    }
}

/// Insertion-ordered parameter map, so emitted settings keep source order.
pub type ParamMap = LinkedHashMap<String, ParamValue>;

/// The uniform output of every protocol parser.
///
/// Constructed exactly once by a parser on successful parse and immutable
/// afterwards. A record only exists if the port was range-checked and every
/// structurally required component was present and non-empty; parsers never
/// return a partially populated record.
///
/// `identity` is protocol-overloaded to keep the record uniform: it carries
/// the cipher method for Shadowsocks (with the password in
/// `secondary_identity`), the user UUID for VMess/VLESS, and the password
/// for Trojan.
///
/// The three parameter maps distinguish "absent" (`None`) from "empty":
/// downstream consumers branch on presence to decide whether to apply TLS
/// at all, so an absent map is never collapsed into `Some(empty)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub protocol: Protocol,
    /// IPv4, bracket-stripped IPv6 literal, or hostname.
    pub server_address: String,
    pub port: u16,
    pub identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_identity: Option<String>,
    /// Percent-decoded display name from the URI fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_settings: Option<ParamMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_settings: Option<ParamMap>,
    /// Recognized-but-unmodeled parameters, excluding keys already promoted
    /// into `tls_settings` or `transport_settings`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_params: Option<ParamMap>,
}
