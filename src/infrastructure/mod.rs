//! Infrastructure layer module
//!
//! This module contains the concrete implementations behind the domain ports:
//! - Chunking (Unicode word-boundary tokenizer, token-window chunker)
//! - Vector stores (JSON snapshot file, Postgres + pgvector)
//! - Configuration management
//! - Logging infrastructure

pub mod chunking;
pub mod config;
pub mod logging;
pub mod vector;
