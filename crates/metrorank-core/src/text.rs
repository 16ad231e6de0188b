// crates/metrorank-core/src/text.rs

//! # Text Utilities
//!
//! Key normalization for joining records across sources, plus the
//! accent-folding helpers used for name matching and ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized join key for a place: folded name followed by country code.
///
/// An empty key means "unmatchable"; callers skip records that produce one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builds the join key for a `(name, country_code)` pair.
///
/// Both inputs are lowercased. Every character outside `[a-z0-9]` is removed
/// from the name; the country code is only lowercased. The two parts are
/// concatenated without a separator, so `"St. Louis"` and `"Stlouis"`
/// collide within the same country.
///
/// Returns an empty key when either input is empty.
///
/// # Examples
///
/// ```rust
/// use metrorank_core::text::canonical_key;
///
/// assert_eq!(canonical_key("New York", "US").as_str(), "newyorkus");
/// assert_eq!(canonical_key("N3w Y0rk!!", "US").as_str(), "n3wy0rkus");
/// assert!(canonical_key("", "US").is_empty());
/// ```
pub fn canonical_key(name: &str, country_code: &str) -> CanonicalKey {
    if name.is_empty() || country_code.is_empty() {
        return CanonicalKey::default();
    }

    let mut key: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    key.push_str(&country_code.to_lowercase());

    CanonicalKey(key)
}

/// Convert a string into a folded key suitable for comparison and ordering.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Łódź` -> `Lodz`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use metrorank_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("São Paulo"), "sao paulo");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Compares two strings for equality after Unicode folding.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Removes accents from Latin letters and keeps the original casing.
///
/// `"Kolkāta"` becomes `"Kolkata"`, `"Zürich"` becomes `"Zurich"`. Letters
/// outside the Latin blocks are left as they are, so `"東京"` stays `"東京"`.
pub fn strip_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{0300}'..='\u{036F}' => {}
            '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}' => {
                match deunicode::deunicode_char(c) {
                    Some(ascii) => out.push_str(ascii),
                    None => out.push(c),
                }
            }
            _ => out.push(c),
        }
    }
    out
}
