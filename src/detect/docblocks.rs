//! Detection of classes and methods without a preceding docblock.
//!
//! The scanner walks the token stream once. A declaration is documented
//! when the nearest token before its keyword is a `/** ... */` comment,
//! looking past whitespace, modifiers (`public`, `static`, `abstract`, ...)
//! and `#[...]` attributes but never past another comment or any other code.
//!
//! Only functions inside a class body are checked. Free functions at file
//! scope are left alone.
//!
//! A docblock above `$f = function () {}` documents the assignment, not the
//! closure, so the closure is still reported. Only a docblock directly before
//! `function` (such as an inline callback argument) counts for a closure.

use std::path::Path;

use tracing::debug;

use crate::parser::{self, ParseError, Token, TokenKind, Tokenizer};

use super::types::{
    ClassStatus, DeclarationKind, FileScan, Finding, ScanConfig, ScanError, ANONYMOUS_FUNCTION,
};

/// Keywords that may sit between a docblock and its declaration keyword.
const MODIFIERS: &[&str] = &[
    "abstract",
    "final",
    "readonly",
    "public",
    "protected",
    "private",
    "static",
];

/// What sits directly before the cursor, for docblock association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preceding {
    Nothing,
    DocComment,
    Other,
}

/// A class body currently open.
#[derive(Debug)]
struct ClassFrame {
    name: String,
    line: usize,
    /// Brace depth inside the body.
    body_depth: usize,
    has_findings: bool,
}

/// Declaration whose keyword was seen but which is not complete yet.
#[derive(Debug)]
enum Pending {
    None,
    /// `class` seen, waiting for the name.
    ClassName {
        line: usize,
        documented: bool,
        enclosing: Option<String>,
    },
    /// Name seen, waiting for the opening brace.
    ClassBody {
        name: String,
        line: usize,
        has_findings: bool,
    },
    /// `function` seen inside a class, waiting for a name or `(`.
    FunctionName { line: usize, documented: bool },
}

/// Scan PHP source text for undocumented declarations.
///
/// `file` is only used to label findings.
pub fn scan_source(file: &str, source: &str, config: &ScanConfig) -> Result<FileScan, ParseError> {
    let mut scanner = DocblockScanner::new(file, config);
    for token in Tokenizer::new(source) {
        scanner.feed(token?);
    }
    Ok(scanner.finish())
}

/// Read and scan a file from disk.
///
/// `shown` is the path reported in findings.
pub fn scan_file(path: &Path, shown: &str, config: &ScanConfig) -> Result<FileScan, ScanError> {
    let bytes = std::fs::read(path)?;
    let source = parser::decode(&bytes);
    let scan = scan_source(shown, &source, config)?;
    debug!(
        file = shown,
        findings = scan.findings.len(),
        classes = scan.classes.len(),
        "scanned file"
    );
    Ok(scan)
}

/// Token-driven state machine behind [`scan_source`].
struct DocblockScanner<'a, 'c> {
    file: &'c str,
    config: &'c ScanConfig,
    depth: usize,
    stack: Vec<ClassFrame>,
    pending: Pending,
    preceding: Preceding,
    /// Last token that is not whitespace, a comment or an attribute.
    prev_code: Option<Token<'a>>,
    findings: Vec<Finding>,
    classes: Vec<ClassStatus>,
}

impl<'a, 'c> DocblockScanner<'a, 'c> {
    fn new(file: &'c str, config: &'c ScanConfig) -> Self {
        Self {
            file,
            config,
            depth: 0,
            stack: Vec::new(),
            pending: Pending::None,
            preceding: Preceding::Nothing,
            prev_code: None,
            findings: Vec::new(),
            classes: Vec::new(),
        }
    }

    fn current_class(&self) -> Option<&str> {
        self.stack.last().map(|frame| frame.name.as_str())
    }

    fn documented(&self) -> bool {
        self.preceding == Preceding::DocComment
    }

    fn feed(&mut self, token: Token<'a>) {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Attribute => return,
            TokenKind::DocComment => {
                self.preceding = Preceding::DocComment;
                return;
            }
            TokenKind::LineComment | TokenKind::BlockComment => {
                self.preceding = Preceding::Other;
                return;
            }
            _ => {}
        }

        if !self.complete_pending(&token) {
            match token.kind {
                TokenKind::OpenBrace => self.open_brace(),
                TokenKind::CloseBrace => self.close_brace(),
                TokenKind::Keyword if token.is_keyword("class") => self.class_keyword(&token),
                TokenKind::Keyword if token.is_keyword("function") => {
                    self.function_keyword(&token)
                }
                _ => {}
            }
        }

        let is_modifier = token.kind == TokenKind::Keyword
            && MODIFIERS.iter().any(|m| token.text.eq_ignore_ascii_case(m));
        if !is_modifier {
            self.preceding = Preceding::Other;
        }
        self.prev_code = Some(token);
    }

    /// Feed `token` to a pending declaration.
    ///
    /// Returns true when the token was used up as a declaration name.
    fn complete_pending(&mut self, token: &Token<'a>) -> bool {
        match std::mem::replace(&mut self.pending, Pending::None) {
            Pending::None => false,
            Pending::ClassName {
                line,
                documented,
                enclosing,
            } => {
                if matches!(token.kind, TokenKind::Identifier | TokenKind::Keyword) {
                    self.declare_class(token.text, line, documented, enclosing);
                    true
                } else {
                    false
                }
            }
            Pending::ClassBody {
                name,
                line,
                has_findings,
            } => {
                if token.kind == TokenKind::OpenBrace {
                    self.depth += 1;
                    self.stack.push(ClassFrame {
                        name,
                        line,
                        body_depth: self.depth,
                        has_findings,
                    });
                    true
                } else {
                    if token.is_keyword("class") || token.kind == TokenKind::CloseBrace {
                        // Body never opened.
                        self.record_status(name, line, has_findings);
                    } else {
                        self.pending = Pending::ClassBody {
                            name,
                            line,
                            has_findings,
                        };
                    }
                    false
                }
            }
            Pending::FunctionName { line, documented } => {
                if token.is_punct("&") {
                    self.pending = Pending::FunctionName { line, documented };
                    true
                } else if matches!(token.kind, TokenKind::Identifier | TokenKind::Keyword) {
                    self.declare_function(DeclarationKind::Method, token.text, line, documented);
                    true
                } else if token.is_punct("(") {
                    self.declare_function(
                        DeclarationKind::AnonymousFunction,
                        ANONYMOUS_FUNCTION,
                        line,
                        documented,
                    );
                    true
                } else {
                    false
                }
            }
        }
    }

    fn follows_member_access(&self) -> bool {
        self.prev_code
            .map_or(false, |t| t.is_punct("->") || t.is_punct("?->") || t.is_punct("::"))
    }

    fn class_keyword(&mut self, token: &Token<'a>) {
        if self.follows_member_access() {
            return;
        }
        // `new class` is an anonymous class: never reported, no scope.
        if self.prev_code.map_or(false, |t| t.is_keyword("new")) {
            return;
        }
        self.pending = Pending::ClassName {
            line: token.line,
            documented: self.documented(),
            enclosing: self.current_class().map(str::to_string),
        };
    }

    fn function_keyword(&mut self, token: &Token<'a>) {
        if self.follows_member_access() || self.prev_code.map_or(false, |t| t.is_keyword("use")) {
            return;
        }
        if self.stack.is_empty() {
            return;
        }
        self.pending = Pending::FunctionName {
            line: token.line,
            documented: self.documented(),
        };
    }

    fn declare_class(
        &mut self,
        name: &str,
        line: usize,
        documented: bool,
        enclosing: Option<String>,
    ) {
        let mut has_findings = false;
        if !documented && self.config.checks(DeclarationKind::Class) {
            has_findings = true;
            self.findings.push(Finding {
                kind: DeclarationKind::Class,
                file: self.file.to_string(),
                class: enclosing,
                name: name.to_string(),
                line,
            });
        }
        self.pending = Pending::ClassBody {
            name: name.to_string(),
            line,
            has_findings,
        };
    }

    fn declare_function(&mut self, kind: DeclarationKind, name: &str, line: usize, documented: bool) {
        if documented || !self.config.checks(kind) {
            return;
        }
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        frame.has_findings = true;
        let class = Some(frame.name.clone());
        self.findings.push(Finding {
            kind,
            file: self.file.to_string(),
            class,
            name: name.to_string(),
            line,
        });
    }

    fn open_brace(&mut self) {
        self.depth += 1;
    }

    fn close_brace(&mut self) {
        if self
            .stack
            .last()
            .map_or(false, |frame| frame.body_depth == self.depth)
        {
            if let Some(frame) = self.stack.pop() {
                self.record_status(frame.name, frame.line, frame.has_findings);
            }
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn record_status(&mut self, name: String, line: usize, has_findings: bool) {
        self.classes.push(ClassStatus {
            name,
            file: self.file.to_string(),
            line,
            clean: !has_findings,
        });
    }

    fn finish(mut self) -> FileScan {
        if let Pending::ClassBody {
            name,
            line,
            has_findings,
        } = std::mem::replace(&mut self.pending, Pending::None)
        {
            self.record_status(name, line, has_findings);
        }
        while let Some(frame) = self.stack.pop() {
            self.record_status(frame.name, frame.line, frame.has_findings);
        }
        self.classes.sort_by_key(|c| c.line);

        FileScan {
            file: self.file.to_string(),
            findings: self.findings,
            classes: self.classes,
        }
    }
}
