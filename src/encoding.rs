//! Transport-safe base64 for the `raw` field of a Gmail message.

/// Standard base64, then `+` → `-`, `/` → `_`, with the trailing `=` padding removed.
pub fn encode(unencoded: impl AsRef<[u8]>) -> String {
    let encoded = base64::encode_config(unencoded, base64::STANDARD);
    encoded
        .replace('+', "-")
        .replace('/', "_")
        .trim_end_matches('=')
        .to_string()
}

/// Inverse of [`encode`].
pub fn decode(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let mut standard = encoded.replace('-', "+").replace('_', "/");
    while standard.len() % 4 != 0 {
        standard.push('=');
    }
    base64::decode_config(standard, base64::STANDARD)
}
