//! Response metadata headers and lenient readers for them
//!
//! All side-channel headers are optional: an absent or malformed value
//! reads as empty text or zero, never as an error.

use reqwest::header::HeaderMap;

pub const REQUEST_ID: &str = "x-reve-request-id";
pub const ERROR_CODE: &str = "x-reve-error-code";
pub const VERSION: &str = "x-reve-version";
pub const CONTENT_VIOLATION: &str = "x-reve-content-violation";
pub const CREDITS_USED: &str = "x-reve-credits-used";
pub const CREDITS_REMAINING: &str = "x-reve-credits-remaining";

/// Header value as text, empty when absent or not visible ASCII
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// Integer header read from its leading digits, so `"12abc"` is 12 and
/// `"-3"` is -3. Zero when absent or when no digits lead the value.
pub fn header_i64(headers: &HeaderMap, name: &str) -> i64 {
    leading_int(header_str(headers, name))
}

fn leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['-', '+']));
    let digits = text[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len() - sign_len);
    text[..sign_len + digits].parse().unwrap_or(0)
}

/// Boolean flag header; only the literal "true" counts
pub fn header_flag(headers: &HeaderMap, name: &str) -> bool {
    header_str(headers, name) == "true"
}
