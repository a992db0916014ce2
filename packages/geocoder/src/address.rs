//! Address normalization shared by geocoder implementations.
//!
//! Addresses typed by people or exported from spreadsheets mix full-width
//! and ASCII digits and carry stray whitespace. Lookups compare
//! normalized forms only.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of whitespace (including the ideographic space).
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\u{3000}]+").expect("valid regex"));

/// Normalizes an address for lookup.
///
/// Full-width digits become ASCII digits, the ideographic space becomes an
/// ASCII space, runs of whitespace collapse to a single space, and leading
/// and trailing whitespace is removed. Everything else is kept as-is.
#[must_use]
pub fn normalize_address(raw: &str) -> String {
    let ascii: String = raw.chars().map(to_half_width).collect();
    WHITESPACE_RE.replace_all(ascii.trim(), " ").into_owned()
}

fn to_half_width(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')).unwrap_or(c),
        '\u{3000}' => ' ',
        _ => c,
    }
}
