//! Plain-text file reader.
//!
//! Turns UTF-8 files into [`Document`]s with `filename`, `source` and
//! `content_type` metadata. Binary formats are out of scope.

use std::path::Path;

use tracing::debug;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::document::keys;
use crate::domain::models::{Document, Metadata};

/// Reads UTF-8 text files into documents
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFileReader;

impl TextFileReader {
    /// Read one file.
    pub async fn read(path: impl AsRef<Path>) -> RagResult<Document> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RagError::InvalidInput(format!("cannot read {}: {e}", path.display())))?;

        let mut metadata = Metadata::new()
            .with(keys::SOURCE, path.display())
            .with(keys::CONTENT_TYPE, content_type(path));
        if let Some(name) = path.file_name() {
            metadata.insert(keys::FILENAME, name.to_string_lossy());
        }

        debug!(path = %path.display(), bytes = text.len(), "read document");
        Ok(Document::new(text).with_metadata(metadata))
    }

    /// Read every file in order; the first failure aborts.
    pub async fn read_all<P: AsRef<Path>>(paths: &[P]) -> RagResult<Vec<Document>> {
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(Self::read(path).await?);
        }
        Ok(documents)
    }
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("md" | "markdown") => "text/markdown",
        Some("json") => "application/json",
        Some("html" | "htm") => "text/html",
        Some("csv") => "text/csv",
        Some("yaml" | "yml") => "application/yaml",
        _ => "text/plain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("a/README.md")), "text/markdown");
        assert_eq!(content_type(Path::new("models.JSON")), "application/json");
        assert_eq!(content_type(Path::new("notes")), "text/plain");
    }

    #[tokio::test]
    async fn test_read_sets_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.md");
        std::fs::write(&path, "# Guide\n\nHello.").unwrap();

        let document = TextFileReader::read(&path).await.unwrap();
        assert_eq!(document.text, "# Guide\n\nHello.");
        assert_eq!(document.metadata.get(keys::FILENAME), Some("guide.md"));
        assert_eq!(document.metadata.get(keys::CONTENT_TYPE), Some("text/markdown"));
        assert!(document.metadata.get(keys::SOURCE).is_some());
    }

    #[tokio::test]
    async fn test_missing_and_binary_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextFileReader::read(dir.path().join("nope.txt")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let binary = dir.path().join("blob.bin");
        std::fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();
        assert!(TextFileReader::read(&binary).await.is_err());
    }
}
