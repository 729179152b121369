//! Durable vector store on Postgres + pgvector
//!
//! Records live in a single table with an HNSW index over the embedding
//! column. Similarity search is delegated to the index, so results are
//! approximate once the collection is large enough for the index to prune.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::{Json, Uuid};
use sqlx::{Postgres, QueryBuilder, Row};
use tracing::{debug, info, instrument};

use super::table::TableName;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{
    Metadata, MetadataFilter, NewRecord, PostgresStoreConfig, ScoredRecord, VectorRecord,
};
use crate::domain::ports::VectorStore;

/// HNSW build parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HnswParams {
    pub m: u32,
    pub ef_construction: u32,
}

/// Vector store backed by a pgvector table.
///
/// Ranking uses cosine distance (`<=>`); the reported score is
/// `1 - distance`. The index picks the top-k candidates; ties among them are
/// broken by the `seq` column, i.e. insertion order. With an HNSW index the
/// top-k is approximate; `ef_search` trades recall for latency.
pub struct PgVectorStore {
    pool: PgPool,
    table: TableName,
    dimension: usize,
    hnsw: HnswParams,
    ef_search: Option<u32>,
}

impl PgVectorStore {
    /// Connect using `config` and create the schema when
    /// `initialize_schema` is set.
    pub async fn connect(config: &PostgresStoreConfig) -> RagResult<Self> {
        let url = config.url.as_deref().ok_or_else(|| {
            RagError::Configuration("store.postgres.url is required for the postgres backend".into())
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await?;

        let store = Self::from_pool(pool, config)?;
        if config.initialize_schema {
            store.initialize_schema().await?;
        }

        info!(
            table = %store.table.qualified(),
            dimension = store.dimension,
            "connected to pgvector store"
        );
        Ok(store)
    }

    /// Wrap an existing pool. No statements are executed.
    pub fn from_pool(pool: PgPool, config: &PostgresStoreConfig) -> RagResult<Self> {
        if config.dimension == 0 {
            return Err(RagError::Configuration(
                "store.postgres.dimension must be greater than 0".into(),
            ));
        }

        Ok(Self {
            pool,
            table: TableName::new(&config.schema, &config.table)?,
            dimension: config.dimension,
            hnsw: HnswParams {
                m: config.hnsw_m,
                ef_construction: config.hnsw_ef_construction,
            },
            ef_search: config.ef_search,
        })
    }

    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    pub const fn table(&self) -> &TableName {
        &self.table
    }

    /// Create the extension, schema, table and HNSW index if missing.
    ///
    /// An existing table whose embedding column has a different dimension is
    /// a configuration error.
    #[instrument(skip(self), fields(table = %self.table.qualified()))]
    pub async fn initialize_schema(&self) -> RagResult<()> {
        let mut tx = self.pool.begin().await?;
        for statement in schema_statements(&self.table, self.dimension, self.hnsw) {
            sqlx::query(&statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        let existing: Option<i32> = sqlx::query_scalar(
            "SELECT a.atttypmod FROM pg_attribute a \
             WHERE a.attrelid = to_regclass($1) AND a.attname = 'embedding' AND NOT a.attisdropped",
        )
        .bind(self.table.qualified())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(existing) = existing {
            if usize::try_from(existing).ok() != Some(self.dimension) {
                return Err(RagError::Configuration(format!(
                    "table {} stores dimension {existing}, configured dimension is {}",
                    self.table.qualified(),
                    self.dimension
                )));
            }
        }

        debug!("schema ready");
        Ok(())
    }

    fn check_dimension(&self, len: usize, what: &str) -> RagResult<()> {
        if len == self.dimension {
            Ok(())
        } else {
            Err(RagError::InvalidInput(format!(
                "{what} has dimension {len}, store expects {}",
                self.dimension
            )))
        }
    }

    fn decode_row(&self, row: &PgRow) -> RagResult<ScoredRecord> {
        let corrupt = |e: sqlx::Error| RagError::corruption(self.table.qualified(), e);

        let id: Uuid = row.try_get("id").map_err(corrupt)?;
        let content: String = row.try_get("content").map_err(corrupt)?;
        let Json(metadata): Json<Metadata> = row.try_get("metadata").map_err(corrupt)?;
        let embedding: Vector = row.try_get("embedding").map_err(corrupt)?;
        let score: Option<f64> = row.try_get("score").map_err(corrupt)?;

        Ok(ScoredRecord {
            record: VectorRecord {
                id: id.to_string(),
                content,
                embedding: embedding.to_vec(),
                metadata,
            },
            // cosine distance to a zero vector is NaN
            score: score.filter(|s| s.is_finite()).unwrap_or(0.0) as f32,
        })
    }
}

fn schema_statements(table: &TableName, dimension: usize, hnsw: HnswParams) -> Vec<String> {
    let qualified = table.qualified();
    vec![
        "CREATE EXTENSION IF NOT EXISTS vector".to_string(),
        format!(
            "CREATE SCHEMA IF NOT EXISTS {}",
            super::table::quote_ident(table.schema())
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {qualified} (\
             id UUID PRIMARY KEY, \
             seq BIGSERIAL, \
             content TEXT NOT NULL, \
             metadata JSONB NOT NULL DEFAULT '{{}}'::jsonb, \
             embedding VECTOR({dimension}) NOT NULL)"
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {qualified} \
             USING hnsw (embedding vector_cosine_ops) \
             WITH (m = {}, ef_construction = {})",
            table.hnsw_index_name(),
            hnsw.m,
            hnsw.ef_construction
        ),
    ]
}

/// Append `filter` as a boolean SQL expression over the `metadata` column.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &MetadataFilter) {
    match filter {
        MetadataFilter::Eq(key, value) => {
            builder.push("(metadata ->> ");
            builder.push_bind(key.clone());
            builder.push(") = ");
            builder.push_bind(value.clone());
        }
        MetadataFilter::In(key, values) => {
            builder.push("(metadata ->> ");
            builder.push_bind(key.clone());
            builder.push(") = ANY(");
            builder.push_bind(values.clone());
            builder.push(")");
        }
        MetadataFilter::Exists(key) => {
            builder.push("metadata ? ");
            builder.push_bind(key.clone());
        }
        MetadataFilter::And(filters) => push_joined(builder, filters, " AND ", "TRUE"),
        MetadataFilter::Or(filters) => push_joined(builder, filters, " OR ", "FALSE"),
        MetadataFilter::Not(inner) => {
            builder.push("NOT (");
            push_filter(builder, inner);
            builder.push(")");
        }
    }
}

fn push_joined(
    builder: &mut QueryBuilder<'_, Postgres>,
    filters: &[MetadataFilter],
    separator: &str,
    empty: &str,
) {
    if filters.is_empty() {
        builder.push(empty);
        return;
    }
    builder.push("(");
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        builder.push("(");
        push_filter(builder, filter);
        builder.push(")");
    }
    builder.push(")");
}

/// Append the search statement. The inner query orders by distance alone so
/// the HNSW index can serve it; ties among the candidates are then broken by
/// `seq`.
fn push_search(
    builder: &mut QueryBuilder<'_, Postgres>,
    table: &TableName,
    query: &[f32],
    top_k: usize,
    filter: Option<&MetadataFilter>,
) {
    builder.push(
        "SELECT id, content, metadata, embedding, 1 - distance AS score FROM \
         (SELECT id, content, metadata, embedding, seq, embedding <=> ",
    );
    builder.push_bind(Vector::from(query.to_vec()));
    builder.push(" AS distance FROM ");
    builder.push(table.qualified());
    if let Some(filter) = filter {
        builder.push(" WHERE ");
        push_filter(builder, filter);
    }
    builder.push(" ORDER BY distance LIMIT ");
    builder.push_bind(i64::try_from(top_k).unwrap_or(i64::MAX));
    builder.push(") AS candidates ORDER BY distance, seq");
}

fn search_query<'a>(
    table: &TableName,
    query: &[f32],
    top_k: usize,
    filter: Option<&MetadataFilter>,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("");
    push_search(&mut builder, table, query, top_k, filter);
    builder
}

#[async_trait]
impl VectorStore for PgVectorStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    #[instrument(skip_all, fields(table = %self.table.qualified(), batch = records.len()))]
    async fn add(&self, records: Vec<NewRecord>) -> RagResult<Vec<String>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        for record in &records {
            self.check_dimension(record.embedding.len(), "embedding")?;
        }

        let sql = format!(
            "INSERT INTO {} (id, content, metadata, embedding) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
             content = EXCLUDED.content, metadata = EXCLUDED.metadata, embedding = EXCLUDED.embedding",
            self.table.qualified()
        );

        let mut ids = Vec::with_capacity(records.len());
        let mut tx = self.pool.begin().await?;
        for record in records {
            let id = Uuid::new_v4();
            sqlx::query(&sql)
                .bind(id)
                .bind(record.content)
                .bind(Json(record.metadata))
                .bind(Vector::from(record.embedding))
                .execute(&mut *tx)
                .await?;
            ids.push(id.to_string());
        }
        tx.commit().await?;

        debug!(added = ids.len(), "inserted records");
        Ok(ids)
    }

    #[instrument(skip_all, fields(table = %self.table.qualified(), top_k = top_k))]
    async fn search(
        &self,
        query: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> RagResult<Vec<ScoredRecord>> {
        if top_k == 0 {
            return Err(RagError::InvalidInput("top_k must be greater than 0".to_string()));
        }
        self.check_dimension(query.len(), "query")?;

        let mut tx = self.pool.begin().await?;
        if let Some(ef_search) = self.ef_search {
            sqlx::query(&format!("SET LOCAL hnsw.ef_search = {ef_search}"))
                .execute(&mut *tx)
                .await?;
        }

        let mut builder = search_query(&self.table, query, top_k, filter);
        let rows = builder.build().fetch_all(&mut *tx).await?;
        tx.commit().await?;

        rows.iter().map(|row| self.decode_row(row)).collect()
    }

    async fn delete(&self, ids: &[String]) -> RagResult<usize> {
        // ids that are not UUIDs cannot be stored here
        let uuids: Vec<Uuid> = ids.iter().filter_map(|id| Uuid::parse_str(id).ok()).collect();
        if uuids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = ANY($1)",
            self.table.qualified()
        ))
        .bind(uuids)
        .execute(&self.pool)
        .await?;

        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }

    async fn count(&self) -> RagResult<usize> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {}",
            self.table.qualified()
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}
