//! reviewctx: dependency-aware context assembly for code review (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod context;
pub mod diff;
pub mod env;
pub mod models;
pub mod output;
pub mod parser;
pub mod relations;
pub mod sources;
