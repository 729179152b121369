//! Raw documents handed to the pipeline by a reader.

use serde::{Deserialize, Serialize};

use super::metadata::Metadata;

/// Well-known metadata keys.
pub mod keys {
    /// Original file name of the source.
    pub const FILENAME: &str = "filename";
    /// MIME type of the source.
    pub const CONTENT_TYPE: &str = "content_type";
    /// Path the source was read from.
    pub const SOURCE: &str = "source";
    /// Ordinal of a chunk within its document.
    pub const CHUNK_INDEX: &str = "chunk_index";
}

/// A document produced by an external reader: plain text plus metadata
/// such as file name, content type or page number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text
    pub text: String,

    /// Reader-provided metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document without metadata
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Set the metadata for this document
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns true if there is nothing but whitespace to index
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
