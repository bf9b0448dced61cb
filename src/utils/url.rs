//! URL encoding/decoding utilities

/// Encodes a string using percent-encoding.
pub fn url_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Decodes a percent-encoded string, returning the original input when it
/// is not decodable (malformed escapes are common in hand-edited links).
pub fn url_decode(input: &str) -> String {
    urlencoding::decode(input)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode("Hello%20World%21"), "Hello World!");
        assert_eq!(url_decode("%E6%97%A5%E6%9C%AC"), "日本");
    }

    #[test]
    fn test_url_decode_malformed_escape_passes_through() {
        assert_eq!(url_decode("100%zz"), "100%zz");
    }

    #[test]
    fn test_url_encode() {
        assert_eq!(url_encode("Hello World!"), "Hello%20World%21");
    }
}
