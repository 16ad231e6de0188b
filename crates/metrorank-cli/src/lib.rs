//! metrorank-cli
//! =============
//!
//! Command-line interface for the `metrorank-core` ranking pipeline.
//!
//! This crate primarily provides a binary (`metrorank`). The library target
//! only exists so docs.rs renders this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! metrorank --help
//! metrorank cities --target 100
//! metrorank metros --top 20
//! metrorank --config metrorank.json rank --stdout
//! metrorank find "sao paulo"
//! metrorank compile -i data/raw_data/simplemaps-worldcities.csv
//! metrorank validate
//! ```
//!
//! For programmatic access use [`metrorank-core`] directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
