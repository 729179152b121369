//! Word-boundary tokenizer.
//!
//! Splits text on Unicode word boundaries (UAX #29). Every segment holding a
//! non-whitespace character is a token: words, numbers and individual
//! punctuation marks. Whitespace segments are separators and are not counted.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// A token and its byte span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn as_str(self, source: &str) -> &str {
        &source[self.start..self.end]
    }

    pub const fn span(self) -> Range<usize> {
        self.start..self.end
    }
}

/// Tokenize `text`, returning tokens in source order.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_word_bound_indices()
        .filter(|(_, segment)| !segment.chars().all(char::is_whitespace))
        .map(|(start, segment)| Token {
            start,
            end: start + segment.len(),
        })
        .collect()
}

/// Number of tokens in `text`.
pub fn count_tokens(text: &str) -> usize {
    text.split_word_bounds()
        .filter(|segment| !segment.chars().all(char::is_whitespace))
        .count()
}
