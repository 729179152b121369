use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};

#[derive(Debug, Serialize)]
pub struct StatsOutput {
    pub backend: String,
    pub records: usize,
    pub embedding_provider: String,
    pub dimension: usize,
}

impl CommandOutput for StatsOutput {
    fn to_human(&self) -> String {
        format!(
            "Backend:    {}\nRecords:    {}\nEmbeddings: {} ({} dimensions)",
            self.backend, self.records, self.embedding_provider, self.dimension
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Handle `ragline stats`
pub async fn execute(ctx: &AppContext, json: bool) -> Result<()> {
    let store = ctx.open_store().await?;
    let records = store.count().await.context("Failed to count records")?;

    output(
        &StatsOutput {
            backend: store.name().to_string(),
            records,
            embedding_provider: ctx.embeddings.provider_name().to_string(),
            dimension: ctx.embeddings.dimension(),
        },
        json,
    );
    Ok(())
}
