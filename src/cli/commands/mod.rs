//! CLI command handlers

pub mod config;
pub mod ingest;
pub mod query;
pub mod stats;
