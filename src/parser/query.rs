//! Query string and form decoding.

use std::collections::HashMap;

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decode a urlencoded string, turning `+` into a space.
///
/// A `%` that is not followed by two hex digits is kept literally.
///
/// ```
/// use tinyweb_rs::parser::urldecode_plus;
///
/// assert_eq!(urldecode_plus("abc%20def"), "abc def");
/// assert_eq!(urldecode_plus("a++b"), "a  b");
/// assert_eq!(urldecode_plus("%%%"), "%%%");
/// ```
pub fn urldecode_plus(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let hi = bytes.get(i + 1).copied().and_then(hex_value);
                let lo = bytes.get(i + 2).copied().and_then(hex_value);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Parse a urlencoded `k=v&k2=v2` string into a map.
///
/// A pair without `=` maps to an empty value; empty pairs are skipped.
pub fn parse_query_string(s: &str) -> HashMap<String, String> {
    s.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (urldecode_plus(k), urldecode_plus(v)),
            None => (urldecode_plus(pair), String::new()),
        })
        .collect()
}
