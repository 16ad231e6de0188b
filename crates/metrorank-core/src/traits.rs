// crates/metrorank-core/src/traits.rs
use crate::loader::Row;
use crate::text::fold_key;

/// Source-specific transform from a raw table row to a typed record.
///
/// Returning `None` means the row lacks a mandatory field and contributes
/// nothing; it is never an error.
pub trait FromRow: Sized {
    /// Human-readable source name used in logs.
    const SOURCE: &'static str;

    fn from_row(row: &Row) -> Option<Self>;
}

/// Name matching shared by population rows, traffic rows and metro areas.
///
/// Both sides are run through [`fold_key`] first, so traffic tables that
/// spell a city with or without accents still line up with the population
/// tables. The override table relies on `name_contains`.
///
/// ```rust
/// use metrorank_core::model::RawTrafficRow;
/// use metrorank_core::traits::NameMatch;
/// use metrorank_core::TrafficRecord;
///
/// let row = RawTrafficRow {
///     name: "São Paulo Guarulhos".into(),
///     city_code: Some("SAO".into()),
///     country_code: None,
///     traffic: TrafficRecord::default(),
/// };
/// assert!(row.name_contains("sao paulo"));
/// assert!(!row.is_named("sao paulo"));
/// assert!(row.is_named("SAO PAULO GUARULHOS"));
/// ```
pub trait NameMatch {
    /// Returns the display name used for matching.
    fn name_str(&self) -> &str;

    /// Equality on the folded form.
    #[inline]
    fn is_named(&self, q: &str) -> bool {
        fold_key(self.name_str()) == fold_key(q)
    }

    /// Substring match on the folded form.
    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        fold_key(self.name_str()).contains(&fold_key(q))
    }
}

/// A scoring strategy over some subject type.
pub trait Scorer<T: ?Sized> {
    fn score(&self, subject: &T) -> f64;
}

/// Anything that can appear in a ranked list.
///
/// Used by the summary statistics so both ranking forms share one
/// implementation.
pub trait Ranked {
    /// Score used for ordering; `None` for rows carried verbatim without one.
    fn rank_score(&self) -> Option<f64>;

    /// Country label used for the per-country distribution.
    fn country_label(&self) -> &str;
}
