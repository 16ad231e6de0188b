// crates/metrorank-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (file access, decompression, CSV framing) and
//! hands header-driven rows to the source-specific transforms in
//! [`crate::sources`].

use crate::error::Result;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

pub mod common_io;

pub use common_io::open_stream;

/// One data line of a tabular source, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    /// Builds a row from `(column, value)` pairs. Handy for tests.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw cell value (untrimmed), if the column exists.
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Trimmed, non-empty cell value.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.raw(column).map(str::trim).filter(|s| !s.is_empty())
    }

    /// First non-empty value among several alternative column names.
    pub fn field_any(&self, columns: &[&str]) -> Option<&str> {
        columns.iter().find_map(|c| self.field(c))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Reads a comma-delimited file with a header line into ordered rows.
///
/// Fails only when the file cannot be opened or the CSV framing itself is
/// broken; content problems are left to the per-source transforms.
pub fn read_table(path: impl AsRef<Path>) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let reader = open_stream(path)?;
    let rows = read_table_from_reader(reader)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "table loaded");
    Ok(rows)
}

/// Same as [`read_table`] but over any reader.
pub fn read_table_from_reader<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // Invalid UTF-8 becomes U+FFFD; the row is kept.
    let headers: Vec<String> = csv_reader
        .byte_headers()?
        .iter()
        .map(|h| lossy(h).trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.byte_records() {
        let record = record?;
        let row = Row {
            fields: headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), lossy(v)))
                .collect(),
        };
        rows.push(row);
    }
    Ok(rows)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_in_order_with_header_names() {
        let data = "city,iso2,population\nTokyo,JP,\"37,977,000\"\n\nDelhi,IN,34665600\n";
        let rows = read_table_from_reader(data.as_bytes()).expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].field("city"), Some("Tokyo"));
        assert_eq!(rows[0].field("population"), Some("37,977,000"));
        assert_eq!(rows[1].field("iso2"), Some("IN"));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let data = "code,name,country\nLON,London\n";
        let rows = read_table_from_reader(data.as_bytes()).expect("parse");
        assert_eq!(rows[0].field("name"), Some("London"));
        assert_eq!(rows[0].field("country"), None);
    }

    #[test]
    fn invalid_utf8_cells_are_decoded_lossily() {
        let data: &[u8] = b"city,iso2\nLima,PE\nS\xe3o Paulo,BR\n";
        let rows = read_table_from_reader(data).expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].field("city"), Some("Lima"));
        assert_eq!(rows[1].field("city"), Some("S\u{fffd}o Paulo"));
        assert_eq!(rows[1].field("iso2"), Some("BR"));
    }

    #[test]
    fn field_any_picks_first_present_column() {
        let row = Row::from_pairs([("countryCode", "de"), ("iso2", " ")]);
        assert_eq!(row.field_any(&["iso2", "countryCode"]), Some("de"));
    }
}
