//! Vector storage backends
//!
//! Two implementations of the [`VectorStore`](crate::domain::ports::VectorStore)
//! port:
//! - [`FileVectorStore`]: in-memory with a JSON snapshot, exact search
//! - [`PgVectorStore`]: Postgres + pgvector HNSW index, approximate search

pub mod factory;
pub mod file_store;
pub mod pg_store;
pub mod table;

pub use factory::open_vector_store;
pub use file_store::FileVectorStore;
pub use pg_store::{HnswParams, PgVectorStore};
pub use table::TableName;
