//! Property-based tests for the token-window chunker

use proptest::prelude::*;
use ragline::{ChunkConfig, Chunker, Document};

fn words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", 1..200)
}

/// Words with punctuation and non-ASCII letters, joined by mixed whitespace.
fn mixed_text_strategy() -> impl Strategy<Value = String> {
    let separator = prop_oneof![Just(" "), Just("\n\n"), Just(", "), Just("\t")];
    prop::collection::vec(("[a-zé]{1,6}[.,;!?]?", separator), 1..200).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(word, separator)| format!("{word}{separator}"))
            .collect::<String>()
    })
}

fn expected_windows(tokens: usize, chunk_size: usize, step: usize) -> usize {
    1 + tokens.saturating_sub(chunk_size).div_ceil(step)
}

proptest! {
    #[test]
    fn prop_indices_are_consecutive(
        words in words_strategy(),
        chunk_size in 1usize..40,
        overlap_ratio in 0.0f64..1.0,
    ) {
        let overlap = ((chunk_size as f64) * overlap_ratio) as usize;
        let config = ChunkConfig::new(chunk_size, overlap.min(chunk_size - 1));
        let chunks = Chunker::split(&Document::new(words.join(" ")), &config).unwrap();

        prop_assert!(!chunks.is_empty());
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
            let index = i.to_string();
            prop_assert_eq!(chunk.metadata.get("chunk_index"), Some(index.as_str()));
            prop_assert!(!chunk.text.is_empty());
        }
    }

    #[test]
    fn prop_every_word_is_covered(
        words in words_strategy(),
        chunk_size in 1usize..40,
        min_chars in 1usize..30,
    ) {
        let config = ChunkConfig::new(chunk_size, 0).with_char_bounds(min_chars, 100_000);
        let chunks = Chunker::split(&Document::new(words.join(" ")), &config).unwrap();

        for word in &words {
            prop_assert!(
                chunks.iter().any(|c| c.text.split(' ').any(|w| w == word)),
                "word {} missing from every chunk", word
            );
        }
    }

    #[test]
    fn prop_window_count_without_guards(
        words in words_strategy(),
        chunk_size in 1usize..40,
        overlap in 0usize..40,
    ) {
        prop_assume!(overlap < chunk_size);
        let config = ChunkConfig::new(chunk_size, overlap).with_char_bounds(1, 100_000);
        let chunks = Chunker::split(&Document::new(words.join(" ")), &config).unwrap();

        prop_assert_eq!(
            chunks.len(),
            expected_windows(words.len(), chunk_size, chunk_size - overlap)
        );
        for chunk in &chunks {
            prop_assert!(Chunker::count_tokens(&chunk.text) <= chunk_size);
        }
    }

    #[test]
    fn prop_char_bounds_hold(
        text in mixed_text_strategy(),
        chunk_size in 1usize..40,
        overlap_ratio in 0.0f64..1.0,
        min_chars in 1usize..30,
        extra in 0usize..150,
        keep_separator in any::<bool>(),
    ) {
        let overlap = (((chunk_size as f64) * overlap_ratio) as usize).min(chunk_size - 1);
        let max_chars = 2 * min_chars + extra;
        let config = ChunkConfig::new(chunk_size, overlap)
            .with_char_bounds(min_chars, max_chars)
            .with_keep_separator(keep_separator);
        let chunks = Chunker::split(&Document::new(text), &config).unwrap();

        prop_assert!(!chunks.is_empty());
        for chunk in &chunks {
            prop_assert!(chunk.char_len() <= max_chars);
            if chunks.len() > 1 {
                prop_assert!(chunk.char_len() >= min_chars);
            }
        }
    }
}

#[test]
fn overlap_not_below_chunk_size_is_rejected() {
    for overlap in [10, 11, 50] {
        let config = ChunkConfig::new(10, overlap);
        assert!(Chunker::split(&Document::new("a b c"), &config).is_err());
    }
}

#[test]
fn document_of_exactly_chunk_size_is_one_chunk() {
    let text = (0..800).map(|i| format!("t{i}")).collect::<Vec<_>>().join(" ");
    assert_eq!(Chunker::count_tokens(&text), 800);

    let chunks = Chunker::split(&Document::new(text.clone()), &ChunkConfig::default()).unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);
}

#[test]
fn keep_separator_false_joins_with_single_spaces() {
    let document = Document::new("alpha\n\nbeta\tgamma");
    let config = ChunkConfig::new(10, 0)
        .with_char_bounds(1, 10_000)
        .with_keep_separator(false);

    let chunks = Chunker::split(&document, &config).unwrap();
    assert_eq!(chunks[0].text, "alpha beta gamma");
}
