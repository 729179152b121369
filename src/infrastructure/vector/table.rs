//! Postgres identifier helpers for the pgvector table.

use crate::domain::errors::{RagError, RagResult};

/// Postgres truncates identifiers longer than this.
const MAX_IDENT_LEN: usize = 63;

/// Fully-qualified Postgres table name (schema + table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    schema: String,
    table: String,
}

impl TableName {
    /// Builds a new table identifier.
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> RagResult<Self> {
        let schema = schema.into();
        let table = table.into();
        check_ident("schema", &schema)?;
        check_ident("table", &table)?;
        Ok(Self { schema, table })
    }

    /// Fully-qualified table reference with quoted identifiers.
    pub fn qualified(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.table))
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Quoted name of the HNSW index on the embedding column.
    pub fn hnsw_index_name(&self) -> String {
        quote_ident(&format!(
            "{}_{}_embedding_hnsw_idx",
            sanitize_ident(&self.schema),
            sanitize_ident(&self.table)
        ))
    }
}

fn check_ident(what: &str, name: &str) -> RagResult<()> {
    if name.trim().is_empty() {
        return Err(RagError::Configuration(format!("{what} name is required")));
    }
    if name.len() > MAX_IDENT_LEN {
        return Err(RagError::Configuration(format!(
            "{what} name '{name}' exceeds {MAX_IDENT_LEN} bytes"
        )));
    }
    if name.contains('\0') {
        return Err(RagError::Configuration(format!(
            "{what} name contains a NUL byte"
        )));
    }
    Ok(())
}

/// Quotes Postgres identifiers, escaping embedded quotes.
pub fn quote_ident(input: &str) -> String {
    let escaped = input.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

fn sanitize_ident(input: &str) -> String {
    input
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}
