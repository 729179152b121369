//! Text chunking domain models
//!
//! Models for splitting documents into bounded, overlapping token windows
//! before they are embedded.

use serde::{Deserialize, Serialize};

use super::metadata::Metadata;
use crate::domain::errors::{RagError, RagResult};

/// Configuration for document chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Target size of each window in tokens
    pub chunk_size: usize,

    /// Tokens repeated between consecutive windows
    pub overlap: usize,

    /// Chunks shorter than this (in characters) merge into a neighbour
    pub min_chunk_size_chars: usize,

    /// Hard cap in characters; longer chunks are cut
    pub max_chunk_size_chars: usize,

    /// Keep the original separators between tokens (true) or collapse them
    /// to single spaces (false)
    pub keep_separator: bool,
}

impl Default for ChunkConfig {
    /// - 800 tokens per window
    /// - 100 tokens overlap
    /// - chunks between 5 and 10000 characters
    /// - original separators kept
    fn default() -> Self {
        Self {
            chunk_size: 800,
            overlap: 100,
            min_chunk_size_chars: 5,
            max_chunk_size_chars: 10_000,
            keep_separator: true,
        }
    }
}

impl ChunkConfig {
    /// Shorthand for a config with the given window and overlap and default
    /// character bounds
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            ..Self::default()
        }
    }

    /// Set the character bounds
    #[must_use]
    pub const fn with_char_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_chunk_size_chars = min;
        self.max_chunk_size_chars = max;
        self
    }

    /// Set separator handling
    #[must_use]
    pub const fn with_keep_separator(mut self, keep: bool) -> Self {
        self.keep_separator = keep;
        self
    }

    /// Number of tokens the window start advances by
    pub const fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> RagResult<()> {
        if self.chunk_size == 0 {
            return Err(RagError::Configuration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.overlap >= self.chunk_size {
            return Err(RagError::Configuration(format!(
                "overlap ({}) must be less than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }

        if self.max_chunk_size_chars == 0 {
            return Err(RagError::Configuration(
                "max_chunk_size_chars must be greater than 0".to_string(),
            ));
        }

        if self.min_chunk_size_chars > self.max_chunk_size_chars {
            return Err(RagError::Configuration(format!(
                "min_chunk_size_chars ({}) exceeds max_chunk_size_chars ({})",
                self.min_chunk_size_chars, self.max_chunk_size_chars
            )));
        }

        Ok(())
    }
}

/// A chunk of text extracted from a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text content of this chunk
    pub text: String,

    /// Index of this chunk within the source document (0-based)
    pub index: usize,

    /// Document metadata plus `chunk_index`
    pub metadata: Metadata,
}

impl Chunk {
    /// Returns true if this is the first chunk
    pub const fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Get a preview of the content (first 100 chars)
    pub fn preview(&self) -> String {
        match self.text.char_indices().nth(100) {
            Some((cut, _)) => format!("{}...", &self.text[..cut]),
            None => self.text.clone(),
        }
    }
}
