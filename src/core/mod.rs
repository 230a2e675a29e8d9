// CounselDesk - core/mod.rs
//
// Core business logic layer: records, table decoding, queries, keyword and
// amount analysis, rendering, and export.
// Must NOT depend on: app, platform, or any network crate.

pub mod amount;
pub mod export;
pub mod keywords;
pub mod model;
pub mod query;
pub mod render;
pub mod table;
