//! Subscription body decoder
//!
//! Subscription services serve either a plain list of config URIs or the
//! same list wrapped in base64 (standard or URL-safe alphabet, padding
//! frequently dropped). The decoder classifies the body and yields
//! numbered candidate lines; it never parses individual URIs.

use log::debug;

use crate::subscription::SubscriptionError;
use crate::utils::base64::base64_decode_flexible;

const SCHEME_PREFIXES: &[&str] = &["ss://", "vmess://", "vless://", "trojan://"];

/// Decodes a subscription body into `(line_number, uri)` candidates.
///
/// Line numbers are 1-based positions in the decoded text, counted before
/// blank lines are dropped, so diagnostics line up with what the user sees
/// when they open the subscription in an editor.
pub fn decode_body(body: &str) -> Result<Vec<(usize, String)>, SubscriptionError> {
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(SubscriptionError::Decode("empty response body".to_string()));
    }

    // Scheme sniffing takes precedence over any base64 attempt: a body
    // that already shows a config URI on its first line is plain text,
    // even if it would also decode as base64.
    let text = if first_line_has_scheme(trimmed) {
        debug!("subscription body is a plain URI list");
        trimmed.to_string()
    } else {
        match base64_decode_flexible(trimmed) {
            Some(decoded) => {
                debug!("subscription body decoded from base64");
                decoded
            }
            None => {
                return Err(SubscriptionError::Decode(
                    "content is not valid base64 and does not look like a list of configuration URIs"
                        .to_string(),
                ))
            }
        }
    };

    Ok(numbered_lines(&text))
}

/// Byte-level entry point for callers holding a raw response body.
pub fn decode_bytes(body: &[u8]) -> Result<Vec<(usize, String)>, SubscriptionError> {
    let text = std::str::from_utf8(body).map_err(|_| {
        SubscriptionError::Decode("response body is not valid UTF-8 text".to_string())
    })?;
    decode_body(text)
}

fn first_line_has_scheme(text: &str) -> bool {
    let first_line = text.lines().next().unwrap_or("").to_ascii_lowercase();
    SCHEME_PREFIXES
        .iter()
        .any(|scheme| first_line.contains(scheme))
}

fn numbered_lines(text: &str) -> Vec<(usize, String)> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() {
                None
            } else {
                Some((index + 1, line.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::base64::base64_encode;

    #[test]
    fn test_plain_text_body() {
        let body = "trojan://a@h:443#One\nvless://u@h:443#Two\n";
        let lines = decode_body(body).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (1, "trojan://a@h:443#One".to_string()));
        assert_eq!(lines[1], (2, "vless://u@h:443#Two".to_string()));
    }

    #[test]
    fn test_base64_body() {
        let plain = "trojan://a@h:443#One\nvless://u@h:443#Two\n";
        let lines = decode_body(&base64_encode(plain)).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].0, 2);
    }

    #[test]
    fn test_base64_and_plain_bodies_decode_identically() {
        let plain = "trojan://a@h:443#One\r\nvless://u@h:443#Two";
        assert_eq!(
            decode_body(plain).unwrap(),
            decode_body(&base64_encode(plain)).unwrap()
        );
    }

    #[test]
    fn test_blank_lines_are_dropped_but_numbering_is_kept() {
        let body = "trojan://a@h:443\n\n   \ntrojan://b@h:443\n";
        let lines = decode_body(body).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, 1);
        assert_eq!(lines[1].0, 4);
    }

    #[test]
    fn test_crlf_newlines() {
        let body = "trojan://a@h:443\r\ntrojan://b@h:443\r\n";
        let lines = decode_body(body).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], (2, "trojan://b@h:443".to_string()));
    }

    #[test]
    fn test_bom_is_stripped_before_sniffing() {
        let body = "\u{feff}trojan://a@h:443\n";
        let lines = decode_body(body).unwrap();
        assert_eq!(lines[0].1, "trojan://a@h:443");
    }

    #[test]
    fn test_empty_body_is_rejected() {
        let err = decode_body("   \n \t ").unwrap_err();
        assert!(err.to_string().contains("empty response body"));
    }

    #[test]
    fn test_undecodable_body_is_rejected() {
        let err = decode_body("certainly *not* a subscription {}").unwrap_err();
        assert!(err.to_string().contains("not valid base64"));
    }

    #[test]
    fn test_url_safe_unpadded_base64_body() {
        // base64url of a URI list uses '-'/'_' and often drops padding.
        let plain = "trojan://a@h:443#?>\n";
        let encoded = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            plain.as_bytes(),
        );
        let lines = decode_body(&encoded).unwrap();
        assert_eq!(lines[0].1, "trojan://a@h:443#?>");
    }

    #[test]
    fn test_decode_bytes_rejects_non_utf8() {
        let err = decode_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_decode_bytes_passes_through_text() {
        let lines = decode_bytes(b"trojan://a@h:443\n").unwrap();
        assert_eq!(lines.len(), 1);
    }
}
