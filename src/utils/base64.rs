use base64::{engine::general_purpose, Engine as _};

/// Encodes a string to standard Base64.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Reverses a URL-safe Base64 string to the standard alphabet.
pub fn url_safe_base64_reverse(input: &str) -> String {
    input.replace('-', "+").replace('_', "/")
}

/// Decodes Base64 that may use either alphabet, with or without padding.
///
/// Community-issued links mix standard and URL-safe Base64 and frequently
/// drop the `=` padding, so the input is normalized to the standard
/// alphabet and re-padded to a multiple of 4 before decoding. Returns
/// `None` when the content is not valid Base64 in either alphabet or does
/// not decode to UTF-8 text.
pub fn base64_decode_flexible(input: &str) -> Option<String> {
    let normalized = url_safe_base64_reverse(input.trim());
    let mut padded = normalized.trim_end_matches('=').to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    let bytes = general_purpose::STANDARD.decode(padded.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}
