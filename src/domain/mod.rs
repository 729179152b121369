//! Domain layer for the ragline pipeline
//!
//! This module contains the core models, the error taxonomy and the port
//! traits that infrastructure and adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{ErrorKind, RagError, RagResult};
