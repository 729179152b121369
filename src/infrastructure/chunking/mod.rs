//! Document chunking infrastructure
//!
//! Unicode word-boundary tokenizer and the token-window [`Chunker`].

pub mod chunker;
pub mod tokenizer;

pub use chunker::Chunker;
pub use tokenizer::{count_tokens, tokenize, Token};
