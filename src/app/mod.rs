// CounselDesk - app/mod.rs
//
// Application layer: data loading, caching, journal write-back, and the
// dashboard state behind each CLI command.
// Dependencies: core, platform, util.

pub mod cache;
pub mod journal;
pub mod source;
pub mod state;
