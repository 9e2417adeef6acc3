//! Single-pass PHP tokenizer.
//!
//! Produces tokens lazily through [`Iterator`]. After the first error the
//! iterator is exhausted. Text outside `<?php` / `<?=` ... `?>` regions is
//! returned as [`TokenKind::InlineHtml`] and never looked into.
//!
//! All slicing happens at ASCII bytes, and every non-ASCII byte belongs to an
//! identifier run, so token boundaries always fall on `char` boundaries.

use lazy_static::lazy_static;
use regex::Regex;

use super::token::{is_keyword, ParseError, Token, TokenKind};

const LABEL: &str = r"(?:[A-Za-z_]|[^\x00-\x7F])(?:[A-Za-z0-9_]|[^\x00-\x7F])*";

lazy_static! {
    /// `<<<ID`, `<<<"ID"` or `<<<'ID'` followed by a newline.
    static ref HEREDOC_START: Regex = Regex::new(&format!(
        r#"^<<<[ \t]*(?:"({LABEL})"|'({LABEL})'|({LABEL}))\r?\n"#
    ))
    .unwrap();
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Lazy tokenizer over PHP source text.
pub struct Tokenizer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    in_php: bool,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            in_php: false,
            finished: false,
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Emit `pos..end` as one token and advance past it.
    fn emit(&mut self, kind: TokenKind, end: usize) -> Token<'a> {
        let text = &self.src[self.pos..end];
        let token = Token {
            kind,
            text,
            line: self.line,
        };
        self.line += text.bytes().filter(|&b| b == b'\n').count();
        self.pos = end;
        token
    }

    /// Locate the next `<?php` or `<?=` at or after `from`.
    ///
    /// Returns the tag start and its length.
    fn find_open_tag(&self, from: usize) -> Option<(usize, usize)> {
        let mut i = from;
        while let Some(offset) = self.src[i..].find("<?") {
            let at = i + offset;
            let rest = &self.bytes[at + 2..];
            if rest.first() == Some(&b'=') {
                return Some((at, 3));
            }
            if rest.len() >= 3
                && rest[..3].eq_ignore_ascii_case(b"php")
                && rest.get(3).map_or(true, |&b| is_space(b))
            {
                return Some((at, 5));
            }
            i = at + 2;
        }
        None
    }

    fn lex_html(&mut self) -> Token<'a> {
        match self.find_open_tag(self.pos) {
            Some((start, len)) if start == self.pos => {
                self.in_php = true;
                self.emit(TokenKind::OpenTag, start + len)
            }
            Some((start, _)) => self.emit(TokenKind::InlineHtml, start),
            None => self.emit(TokenKind::InlineHtml, self.bytes.len()),
        }
    }

    fn lex_php(&mut self) -> Result<Token<'a>, ParseError> {
        let b = self.bytes[self.pos];
        let token = match b {
            b if is_space(b) => {
                let end = self.scan_while(self.pos, is_space);
                self.emit(TokenKind::Whitespace, end)
            }
            b'?' if self.peek(1) == Some(b'>') => {
                let mut end = self.pos + 2;
                // The close tag swallows one directly following newline.
                if self.bytes.get(end) == Some(&b'\n') {
                    end += 1;
                } else if self.bytes.get(end..end + 2) == Some(b"\r\n".as_slice()) {
                    end += 2;
                }
                self.in_php = false;
                self.emit(TokenKind::CloseTag, end)
            }
            b'?' if self.peek(1) == Some(b'-') && self.peek(2) == Some(b'>') => {
                self.emit(TokenKind::Other, self.pos + 3)
            }
            b'#' if self.peek(1) == Some(b'[') => {
                let end = self.scan_attribute()?;
                self.emit(TokenKind::Attribute, end)
            }
            b'#' => {
                let end = self.scan_line_comment();
                self.emit(TokenKind::LineComment, end)
            }
            b'/' if self.peek(1) == Some(b'/') => {
                let end = self.scan_line_comment();
                self.emit(TokenKind::LineComment, end)
            }
            b'/' if self.peek(1) == Some(b'*') => {
                let is_doc = self.peek(2) == Some(b'*') && self.peek(3).map_or(false, is_space);
                let end = match self.src[self.pos + 2..].find("*/") {
                    Some(offset) => self.pos + 2 + offset + 2,
                    None => return Err(ParseError::UnterminatedComment { line: self.line }),
                };
                let kind = if is_doc {
                    TokenKind::DocComment
                } else {
                    TokenKind::BlockComment
                };
                self.emit(kind, end)
            }
            b'\'' | b'"' | b'`' => {
                let end = self
                    .scan_quoted(self.pos)
                    .ok_or(ParseError::UnterminatedString { line: self.line })?;
                self.emit(TokenKind::String, end)
            }
            b'<' if self.src[self.pos..].starts_with("<<<") => match self.scan_heredoc()? {
                Some(end) => self.emit(TokenKind::String, end),
                None => self.emit(TokenKind::Other, self.pos + 1),
            },
            b'$' if self.peek(1).map_or(false, is_ident_start) => {
                let end = self.scan_while(self.pos + 1, is_ident_char);
                self.emit(TokenKind::Variable, end)
            }
            b if is_ident_start(b) => {
                let end = self.scan_while(self.pos, is_ident_char);
                let kind = if is_keyword(&self.src[self.pos..end]) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                self.emit(kind, end)
            }
            b if b.is_ascii_digit() => {
                let end = self.scan_while(self.pos, |b| is_ident_char(b) || b == b'.');
                self.emit(TokenKind::Other, end)
            }
            b'{' => self.emit(TokenKind::OpenBrace, self.pos + 1),
            b'}' => self.emit(TokenKind::CloseBrace, self.pos + 1),
            b'-' if self.peek(1) == Some(b'>') => self.emit(TokenKind::Other, self.pos + 2),
            b':' if self.peek(1) == Some(b':') => self.emit(TokenKind::Other, self.pos + 2),
            _ => self.emit(TokenKind::Other, self.pos + 1),
        };
        Ok(token)
    }

    fn scan_while(&self, from: usize, pred: impl Fn(u8) -> bool) -> usize {
        let mut i = from;
        while i < self.bytes.len() && pred(self.bytes[i]) {
            i += 1;
        }
        i
    }

    /// End of a `//` or `#` comment: before the newline or a `?>`.
    fn scan_line_comment(&self) -> usize {
        let mut i = self.pos;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\n' | b'\r' => break,
                b'?' if self.bytes.get(i + 1) == Some(&b'>') => break,
                _ => i += 1,
            }
        }
        i
    }

    /// End of a quoted string opening at `open`, or `None` if unterminated.
    ///
    /// Double-quoted and backtick strings may embed `{$expr}` / `${expr}`
    /// interpolations, which can contain their own quoted strings.
    fn scan_quoted(&self, open: usize) -> Option<usize> {
        let quote = self.bytes[open];
        let interpolates = quote != b'\'';
        let mut i = open + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b if b == quote => return Some(i + 1),
                b'{' if interpolates && self.bytes.get(i + 1) == Some(&b'$') => {
                    i = self.scan_interpolation(i)?;
                }
                b'$' if interpolates && self.bytes.get(i + 1) == Some(&b'{') => {
                    i = self.scan_interpolation(i + 1)?;
                }
                _ => i += 1,
            }
        }
        None
    }

    /// End of a brace-balanced interpolation starting at the `{` at `open`.
    fn scan_interpolation(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'{' => {
                    depth += 1;
                    i += 1;
                }
                b'}' => {
                    depth -= 1;
                    i += 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                b'\'' | b'"' | b'`' => i = self.scan_quoted(i)?,
                _ => i += 1,
            }
        }
        None
    }

    /// End of a `#[ ... ]` attribute group.
    fn scan_attribute(&self) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        let mut i = self.pos + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'[' => {
                    depth += 1;
                    i += 1;
                }
                b']' => {
                    depth -= 1;
                    i += 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                b'\'' | b'"' => {
                    i = self
                        .scan_quoted(i)
                        .ok_or(ParseError::UnterminatedString { line: self.line })?;
                }
                _ => i += 1,
            }
        }
        Err(ParseError::UnterminatedAttribute { line: self.line })
    }

    /// End of a heredoc or nowdoc, or `None` when `<<<` does not start one.
    ///
    /// The closing label may be indented and must not be followed by an
    /// identifier character.
    fn scan_heredoc(&self) -> Result<Option<usize>, ParseError> {
        let Some(caps) = HEREDOC_START.captures(&self.src[self.pos..]) else {
            return Ok(None);
        };
        let label = match caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) {
            Some(m) => m.as_str(),
            None => return Ok(None),
        };
        let unterminated = || ParseError::UnterminatedHeredoc {
            label: label.to_string(),
            line: self.line,
        };

        let len = self.bytes.len();
        let mut line_start = self.pos + caps.get(0).map_or(0, |m| m.end());
        loop {
            let line_end = self.src[line_start..]
                .find('\n')
                .map_or(len, |offset| line_start + offset);
            let line = &self.src[line_start..line_end];
            let body = line.trim_start_matches([' ', '\t']);
            if let Some(after) = body.strip_prefix(label) {
                if !after.bytes().next().map_or(false, is_ident_char) {
                    let indent = line.len() - body.len();
                    return Ok(Some(line_start + indent + label.len()));
                }
            }
            if line_end >= len {
                return Err(unterminated());
            }
            line_start = line_end + 1;
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.pos >= self.bytes.len() {
            return None;
        }
        let result = if self.in_php {
            self.lex_php()
        } else {
            Ok(self.lex_html())
        };
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}

/// Tokenize a whole source text eagerly.
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, ParseError> {
    Tokenizer::new(src).collect()
}
