//! UTF-8 encoding and formatting reference vectors.

/// UTF-8 bytes of a single scalar value.
pub fn utf8_bytes(c: char) -> Vec<u8> {
    let mut buf = [0u8; 4];
    c.encode_utf8(&mut buf).as_bytes().to_vec()
}

/// Lowercase hex, two digits per byte, no separators.
pub fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// `\u{...}` escapes for every char in the input.
pub fn unicode_escape(s: &str) -> String {
    s.chars().flat_map(char::escape_unicode).collect()
}
