//! Token-window chunking
//!
//! Splits a document into overlapping windows of `chunk_size` tokens, then
//! applies the character-length guards of [`ChunkConfig`].

use std::ops::Range;

use tracing::debug;

use super::tokenizer::{self, Token};
use crate::domain::errors::RagResult;
use crate::domain::models::document::keys;
use crate::domain::models::{Chunk, ChunkConfig, Document, Metadata};

/// Token-window chunker
///
/// Windows advance by `chunk_size - overlap` tokens. A rendered window
/// shorter than `min_chunk_size_chars` is folded into the previous window
/// (the first one into the next), and a chunk longer than
/// `max_chunk_size_chars` is cut into near-equal character pieces.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chunker;

impl Chunker {
    /// Split `document` into chunks.
    ///
    /// Fails only on an invalid `config`. Empty or whitespace-only text
    /// yields no chunks.
    pub fn split(document: &Document, config: &ChunkConfig) -> RagResult<Vec<Chunk>> {
        config.validate()?;

        let text = document.text.as_str();
        let tokens = tokenizer::tokenize(text);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let renderer = Renderer {
            text,
            tokens: &tokens,
            keep_separator: config.keep_separator,
        };

        let windows = windows(tokens.len(), config.chunk_size, config.step());
        let merged = merge_short(&renderer, windows, config.min_chunk_size_chars);

        let chunks: Vec<Chunk> = merged
            .into_iter()
            .flat_map(|rendered| split_long(&rendered, config.max_chunk_size_chars))
            .enumerate()
            .map(|(index, text)| Chunk {
                metadata: document
                    .metadata
                    .merged_with(&Metadata::new().with(keys::CHUNK_INDEX, index)),
                text,
                index,
            })
            .collect();

        debug!(
            tokens = tokens.len(),
            chunks = chunks.len(),
            chunk_size = config.chunk_size,
            overlap = config.overlap,
            "split document"
        );

        Ok(chunks)
    }

    /// Count tokens with the same tokenizer used for windowing.
    pub fn count_tokens(text: &str) -> usize {
        tokenizer::count_tokens(text)
    }
}

struct Renderer<'a> {
    text: &'a str,
    tokens: &'a [Token],
    keep_separator: bool,
}

impl Renderer<'_> {
    fn render(&self, range: Range<usize>) -> String {
        let covered = &self.tokens[range];
        match (covered.first(), covered.last()) {
            (Some(first), Some(last)) if self.keep_separator => {
                self.text[first.start..last.end].to_string()
            }
            _ => covered
                .iter()
                .map(|token| token.as_str(self.text))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Token ranges of every window. The last window is the first one that
/// reaches the final token.
fn windows(token_count: usize, chunk_size: usize, step: usize) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + chunk_size).min(token_count);
        ranges.push(start..end);
        if end >= token_count {
            break;
        }
        start += step;
    }
    ranges
}

/// Fold windows that render shorter than `min_chars` into a neighbour by
/// uniting their token ranges, so overlapping tokens are not repeated.
fn merge_short(renderer: &Renderer<'_>, windows: Vec<Range<usize>>, min_chars: usize) -> Vec<String> {
    if windows.len() == 1 {
        return windows.into_iter().map(|w| renderer.render(w)).collect();
    }

    let mut merged: Vec<(Range<usize>, String)> = Vec::with_capacity(windows.len());
    // a short leading window waiting to be joined with the next one
    let mut pending: Option<Range<usize>> = None;

    for window in windows {
        let range = match pending.take() {
            Some(head) => head.start..window.end,
            None => window,
        };
        let rendered = renderer.render(range.clone());

        if rendered.chars().count() >= min_chars {
            merged.push((range, rendered));
            continue;
        }

        match merged.last_mut() {
            Some((previous, previous_text)) => {
                previous.end = range.end;
                *previous_text = renderer.render(previous.clone());
            }
            None => pending = Some(range),
        }
    }

    if let Some(range) = pending {
        let rendered = renderer.render(range.clone());
        merged.push((range, rendered));
    }

    merged.into_iter().map(|(_, text)| text).collect()
}

/// Cut `text` into `ceil(len / max_chars)` pieces of near-equal character
/// length. Texts within the limit pass through unchanged.
fn split_long(text: &str, max_chars: usize) -> Vec<String> {
    let char_len = text.chars().count();
    if char_len <= max_chars {
        return vec![text.to_string()];
    }

    let pieces = char_len.div_ceil(max_chars);
    let base = char_len / pieces;
    let longer = char_len % pieces;

    let mut out = Vec::with_capacity(pieces);
    let mut chars = text.chars();
    for piece in 0..pieces {
        let len = if piece < longer { base + 1 } else { base };
        out.push(chars.by_ref().take(len).collect());
    }
    out
}
