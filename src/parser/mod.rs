//! PHP tokenization.
//!
//! This module provides:
//! - `Token` / `TokenKind`: lexical tokens with their starting line
//! - `Tokenizer`: a lazy, single-pass tokenizer over source text
//! - `ParseError`: raised for unterminated comments, strings and heredocs

mod token;
mod tokenizer;

pub use token::{is_keyword, ParseError, Token, TokenKind};
pub use tokenizer::{tokenize, Tokenizer};

/// Decode raw file bytes, replacing invalid UTF-8 sequences.
///
/// PHP sources are frequently Latin-1; lossy decoding keeps line structure
/// and ASCII syntax intact, which is all the scanner needs.
pub fn decode(source: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(source)
}
