// src/lib.rs

//! Workspace umbrella crate. Hosts the demos; everything lives in
//! `metrorank-core`.

pub use metrorank_core::*;
