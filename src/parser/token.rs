//! Lexical tokens produced by the tokenizer.

use std::fmt;

use phf::phf_set;
use thiserror::Error;

/// Reserved words the scanner cares about, lowercase.
///
/// PHP keywords are case-insensitive, so lookups go through
/// [`is_keyword`] which lowercases first.
static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "abstract",
    "class",
    "const",
    "enum",
    "extends",
    "final",
    "fn",
    "function",
    "implements",
    "interface",
    "namespace",
    "new",
    "private",
    "protected",
    "public",
    "readonly",
    "static",
    "trait",
    "use",
    "var",
};

/// Check whether an identifier is one of the recognized keywords.
pub fn is_keyword(word: &str) -> bool {
    if word.bytes().all(|b| b.is_ascii_lowercase()) {
        return KEYWORDS.contains(word);
    }
    KEYWORDS.contains(word.to_ascii_lowercase().as_str())
}

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    /// `$name`
    Variable,
    OpenBrace,
    CloseBrace,
    /// `/** ... */`
    DocComment,
    /// `// ...` or `# ...`
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// `#[ ... ]`
    Attribute,
    Whitespace,
    /// Quoted strings, heredocs and nowdocs.
    String,
    /// `<?php` or `<?=`
    OpenTag,
    /// `?>`
    CloseTag,
    /// Text outside of PHP tags.
    InlineHtml,
    Other,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Variable => "variable",
            TokenKind::OpenBrace => "open_brace",
            TokenKind::CloseBrace => "close_brace",
            TokenKind::DocComment => "doc_comment",
            TokenKind::LineComment => "line_comment",
            TokenKind::BlockComment => "block_comment",
            TokenKind::Attribute => "attribute",
            TokenKind::Whitespace => "whitespace",
            TokenKind::String => "string",
            TokenKind::OpenTag => "open_tag",
            TokenKind::CloseTag => "close_tag",
            TokenKind::InlineHtml => "inline_html",
            TokenKind::Other => "other",
        }
    }

    /// Any of the three comment forms.
    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            TokenKind::DocComment | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Tokens with no effect on the code structure.
    pub fn is_trivia(&self) -> bool {
        self.is_comment() || matches!(self, TokenKind::Whitespace)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single token, borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Line the token starts on (1-indexed).
    pub line: usize,
}

impl<'a> Token<'a> {
    /// Case-insensitive keyword comparison.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text.eq_ignore_ascii_case(word)
    }

    /// Exact comparison for punctuation tokens.
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Other && self.text == punct
    }
}

/// Errors raised when source text cannot be tokenized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unterminated comment starting on line {line}")]
    UnterminatedComment { line: usize },
    #[error("unterminated string starting on line {line}")]
    UnterminatedString { line: usize },
    #[error("unterminated heredoc `{label}` starting on line {line}")]
    UnterminatedHeredoc { label: String, line: usize },
    #[error("unterminated attribute starting on line {line}")]
    UnterminatedAttribute { line: usize },
}

impl ParseError {
    /// Line where the offending construct starts.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnterminatedComment { line }
            | ParseError::UnterminatedString { line }
            | ParseError::UnterminatedHeredoc { line, .. }
            | ParseError::UnterminatedAttribute { line } => *line,
        }
    }
}
