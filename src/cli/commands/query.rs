use anyhow::{Context, Result};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::document::keys;
use crate::domain::models::{Metadata, MetadataFilter};
use crate::services::{AugmentedContext, RetrievalAugmenter};

#[derive(Debug, Serialize)]
pub struct QueryHit {
    pub rank: usize,
    pub score: f32,
    pub id: String,
    pub content: String,
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub question: String,
    pub hits: Vec<QueryHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl QueryOutput {
    fn from_context(question: &str, context: &AugmentedContext, with_prompt: bool) -> Self {
        let hits = context
            .retrieved
            .iter()
            .enumerate()
            .map(|(i, hit)| QueryHit {
                rank: i + 1,
                score: hit.score,
                id: hit.record.id.clone(),
                content: hit.record.content.clone(),
                metadata: hit.record.metadata.clone(),
            })
            .collect();

        Self {
            question: question.to_string(),
            hits,
            prompt: with_prompt.then(|| context.prompt_for(question)),
        }
    }
}

impl CommandOutput for QueryOutput {
    fn to_human(&self) -> String {
        if let Some(ref prompt) = self.prompt {
            return prompt.clone();
        }
        if self.hits.is_empty() {
            return "No matching chunks found.".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").add_attribute(Attribute::Bold),
                Cell::new("Score").add_attribute(Attribute::Bold),
                Cell::new("Source").add_attribute(Attribute::Bold),
                Cell::new("Chunk").add_attribute(Attribute::Bold),
                Cell::new("Content").add_attribute(Attribute::Bold),
            ]);

        for hit in &self.hits {
            table.add_row(vec![
                Cell::new(hit.rank),
                Cell::new(format!("{:.3}", hit.score)),
                Cell::new(hit.metadata.get(keys::FILENAME).unwrap_or("-")),
                Cell::new(hit.metadata.get(keys::CHUNK_INDEX).unwrap_or("-")),
                Cell::new(truncate(&hit.content, 80)),
            ]);
        }

        format!(
            "{table}\n\nShowing {} chunk{}",
            self.hits.len(),
            if self.hits.len() == 1 { "" } else { "s" }
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Parse repeated `key=value` flags into a single conjunctive filter
pub fn parse_filters(pairs: &[String]) -> Result<Option<MetadataFilter>> {
    let mut filters = pairs
        .iter()
        .map(|pair| {
            MetadataFilter::parse_pair(pair)
                .with_context(|| format!("Invalid filter '{pair}', expected KEY=VALUE"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(MetadataFilter::And(filters)),
    })
}

/// Handle `ragline query`
pub async fn execute(
    ctx: &AppContext,
    question: String,
    top_k: Option<usize>,
    filters: &[String],
    prompt: bool,
    json: bool,
) -> Result<()> {
    let filter = parse_filters(filters)?;
    let store = ctx.open_store().await?;
    let augmenter = RetrievalAugmenter::new(
        ctx.embeddings.clone(),
        store,
        ctx.config.retrieval.clone(),
    );

    let top_k = top_k.unwrap_or(ctx.config.retrieval.top_k);
    let context = augmenter
        .augment_filtered(&question, top_k, filter.as_ref())
        .await
        .context("Retrieval failed")?;

    output(&QueryOutput::from_context(&question, &context, prompt), json);
    Ok(())
}
