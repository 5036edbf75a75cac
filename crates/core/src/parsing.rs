//! Lenient value parsing used by map and config files
//!
//! Map files are hand-edited, so numeric values are read forgivingly:
//! leading whitespace is skipped, trailing garbage is ignored and a value
//! with no digits falls back to a caller-supplied default.

use crate::{CoreError, Result};

/// Parse the leading integer of `s`, or return `default` if there is none
pub fn to_int(s: &str, default: i32) -> i32 {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return default;
    }

    match s[..end].parse::<i64>() {
        Ok(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        // Only overflow can get here; saturate in the direction of the sign
        Err(_) if bytes[0] == b'-' => i32::MIN,
        Err(_) => i32::MAX,
    }
}

/// Parse a boolean flag (`true`/`false`, `yes`/`no`, `1`/`0`)
pub fn to_bool(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1" | "on"
    )
}

/// Remove and return the first `separator`-delimited field of `s`
///
/// Returns an empty string once `s` is exhausted.
pub fn pop_first_string(s: &mut String, separator: char) -> String {
    match s.find(separator) {
        Some(pos) => {
            let first = s[..pos].trim().to_string();
            s.drain(..pos + separator.len_utf8());
            first
        }
        None => {
            let first = s.trim().to_string();
            s.clear();
            first
        }
    }
}

/// Remove and return the first `separator`-delimited integer of `s`
pub fn pop_first_int(s: &mut String, separator: char) -> i32 {
    to_int(&pop_first_string(s, separator), 0)
}

/// Parse a duration in milliseconds
///
/// `250ms` and `2s` carry explicit units; a bare number is milliseconds.
pub fn parse_duration_ms(s: &str) -> Result<u32> {
    let s = s.trim();
    let (number, scale) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1000)
    } else {
        (s, 1)
    };

    let value: u32 = number
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidData(format!("Invalid duration: {}", s)))?;
    Ok(value.saturating_mul(scale))
}
