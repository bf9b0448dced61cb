//! Stable identity generation for imported configs
//!
//! Identities hash the normalized raw URI text, not the parsed fields: two
//! textually distinct URIs that parse to equivalent records must not
//! collide, while re-parsing the same literal URI is idempotent.

use md5::{Digest, Md5};

/// Normalize a raw URI for hashing: trim surrounding whitespace and
/// lowercase the scheme portion, leaving the rest byte-identical.
pub fn normalize_uri(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.find("://") {
        Some(pos) => {
            let (scheme, rest) = trimmed.split_at(pos);
            format!("{}{}", scheme.to_ascii_lowercase(), rest)
        }
        None => trimmed.to_string(),
    }
}

/// Deterministic id for an imported config: lowercase-hex MD5 of the
/// normalized raw URI.
pub fn config_id(raw_uri: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(normalize_uri(raw_uri).as_bytes());
    let digest = hasher.finalize();

    let mut id = String::with_capacity(digest.len() * 2);
    for byte in digest {
        id.push_str(&format!("{:02x}", byte));
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_scheme_only() {
        assert_eq!(
            normalize_uri("  SS://PayLoad#Remark "),
            "ss://PayLoad#Remark"
        );
        assert_eq!(normalize_uri("no scheme here"), "no scheme here");
    }

    #[test]
    fn test_id_is_deterministic() {
        let a = config_id("trojan://secret@example.com:443");
        let b = config_id("trojan://secret@example.com:443");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_id_ignores_whitespace_and_scheme_case() {
        let canonical = config_id("trojan://secret@example.com:443");
        assert_eq!(config_id(" TROJAN://secret@example.com:443\n"), canonical);
    }

    #[test]
    fn test_textually_distinct_uris_do_not_collide() {
        // Same logical config, different text: these must stay distinct.
        let plain = config_id("trojan://secret@example.com:443");
        let with_remark = config_id("trojan://secret@example.com:443#Node");
        assert_ne!(plain, with_remark);
    }
}
