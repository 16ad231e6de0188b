// crates/metrorank-core/src/coerce.rs

//! Lenient numeric parsing.
//!
//! Source tables are messy: figures carry thousands separators, blanks and
//! the odd `"n/a"`. A bad number must never abort a run, so every parser here
//! falls back to zero and reports that it did.

/// Result of a parse-or-default conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    /// `true` when the input could not be parsed and `value` is the default.
    pub defaulted: bool,
}

impl<T> Parsed<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            defaulted: false,
        }
    }
}

/// Parses an integer count such as `"1,234,567"`.
///
/// Commas are removed first. Decimal inputs (`"1234.9"`) are truncated
/// toward zero. Anything else yields `0` with `defaulted` set.
pub fn parse_count(raw: Option<&str>) -> Parsed<i64> {
    let cleaned = match raw {
        Some(s) => s.trim().replace(',', ""),
        None => String::new(),
    };

    if let Ok(v) = cleaned.parse::<i64>() {
        return Parsed::ok(v);
    }
    if let Ok(f) = cleaned.parse::<f64>() {
        if f.is_finite() {
            return Parsed::ok(f.trunc() as i64);
        }
    }

    if !cleaned.is_empty() {
        tracing::trace!(input = %cleaned, "numeric field defaulted to 0");
    }
    Parsed {
        value: 0,
        defaulted: true,
    }
}

/// Parses a floating point value such as a coordinate or a score.
pub fn parse_float(raw: Option<&str>) -> Parsed<f64> {
    let cleaned = raw.map(str::trim).unwrap_or("");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Parsed::ok(v),
        _ => {
            if !cleaned.is_empty() {
                tracing::trace!(input = %cleaned, "float field defaulted to 0");
            }
            Parsed {
                value: 0.0,
                defaulted: true,
            }
        }
    }
}

/// Like [`parse_float`] but keeps "absent" distinct from "zero".
pub fn parse_opt_f64(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
}
