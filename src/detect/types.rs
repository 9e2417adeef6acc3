//! Core types for docblock scan results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::ParseError;

/// Name used for functions declared without one (closures).
pub const ANONYMOUS_FUNCTION: &str = "anonymous function";

/// Kind of declaration that was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Method,
    AnonymousFunction,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Method => "method",
            DeclarationKind::AnonymousFunction => "anonymous_function",
        }
    }

    /// Record type used in the JSON report.
    ///
    /// Anonymous functions are reported alongside methods.
    pub fn report_type(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Method | DeclarationKind::AnonymousFunction => "method",
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Method | DeclarationKind::AnonymousFunction
        )
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which declaration kinds to leave unchecked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub skip_classes: bool,
    #[serde(default)]
    pub skip_methods: bool,
    /// Also implied by `skip_methods`.
    #[serde(default)]
    pub skip_anonymous_functions: bool,
}

impl ScanConfig {
    /// Whether declarations of `kind` should be checked for a docblock.
    pub fn checks(&self, kind: DeclarationKind) -> bool {
        match kind {
            DeclarationKind::Class => !self.skip_classes,
            DeclarationKind::Method => !self.skip_methods,
            DeclarationKind::AnonymousFunction => {
                !self.skip_methods && !self.skip_anonymous_functions
            }
        }
    }
}

/// A declaration missing its docblock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: DeclarationKind,
    pub file: String,
    /// Enclosing class; `None` for top-level classes.
    pub class: Option<String>,
    pub name: String,
    pub line: usize,
}

impl Finding {
    /// Class the finding belongs to: the class itself, or the class
    /// enclosing a method.
    pub fn owner(&self) -> &str {
        match self.kind {
            DeclarationKind::Class => &self.name,
            _ => self.class.as_deref().unwrap_or_default(),
        }
    }

    pub fn message(&self) -> String {
        match self.kind {
            DeclarationKind::Class => format!("Class {} is missing a docblock.", self.name),
            _ => format!(
                "Method {}::{} is missing a docblock.",
                self.owner(),
                self.name
            ),
        }
    }
}

/// Outcome for one processed class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStatus {
    pub name: String,
    pub file: String,
    pub line: usize,
    /// No findings for the class itself or its members.
    pub clean: bool,
}

/// Results of scanning a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    pub file: String,
    /// In source order.
    pub findings: Vec<Finding>,
    /// Ordered by declaration line.
    pub classes: Vec<ClassStatus>,
}

/// Why a file could not be scanned.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// A file that was skipped.
#[derive(Debug)]
pub struct FileError {
    pub file: String,
    pub error: ScanError,
}

/// Aggregated results of scanning many files, in file order.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub files: Vec<FileScan>,
    pub errors: Vec<FileError>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, scan: FileScan) {
        self.files.push(scan);
    }

    pub fn add_error(&mut self, file: String, error: ScanError) {
        self.errors.push(FileError { file, error });
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: ScanReport) {
        self.files.extend(other.files);
        self.errors.extend(other.errors);
    }

    /// All findings, grouped by file and in source order within a file.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.iter().flat_map(|f| f.findings.iter())
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassStatus> {
        self.files.iter().flat_map(|f| f.classes.iter())
    }

    pub fn finding_count(&self) -> usize {
        self.files.iter().map(|f| f.findings.len()).sum()
    }

    pub fn has_findings(&self) -> bool {
        self.finding_count() > 0
    }

    pub fn count(&self, kind: DeclarationKind) -> usize {
        self.findings().filter(|f| f.kind == kind).count()
    }

    /// Number of files scanned successfully.
    pub fn scanned(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(kind: DeclarationKind, class: Option<&str>, name: &str) -> Finding {
        Finding {
            kind,
            file: "src/Foo.php".to_string(),
            class: class.map(str::to_string),
            name: name.to_string(),
            line: 3,
        }
    }

    #[test]
    fn test_skip_methods_implies_skip_anonymous() {
        let config = ScanConfig {
            skip_methods: true,
            ..Default::default()
        };
        assert!(config.checks(DeclarationKind::Class));
        assert!(!config.checks(DeclarationKind::Method));
        assert!(!config.checks(DeclarationKind::AnonymousFunction));
    }

    #[test]
    fn test_skip_anonymous_keeps_methods() {
        let config = ScanConfig {
            skip_anonymous_functions: true,
            ..Default::default()
        };
        assert!(config.checks(DeclarationKind::Method));
        assert!(!config.checks(DeclarationKind::AnonymousFunction));
    }

    #[test]
    fn test_messages() {
        let class = finding(DeclarationKind::Class, None, "Foo");
        assert_eq!(class.owner(), "Foo");
        assert_eq!(class.message(), "Class Foo is missing a docblock.");

        let method = finding(DeclarationKind::Method, Some("Foo"), "run");
        assert_eq!(method.owner(), "Foo");
        assert_eq!(method.message(), "Method Foo::run is missing a docblock.");

        let closure = finding(
            DeclarationKind::AnonymousFunction,
            Some("Foo"),
            ANONYMOUS_FUNCTION,
        );
        assert_eq!(
            closure.message(),
            "Method Foo::anonymous function is missing a docblock."
        );
        assert_eq!(closure.kind.report_type(), "method");
    }

    #[test]
    fn test_report_merge() {
        let mut report = ScanReport::new();
        report.add_file(FileScan {
            file: "a.php".to_string(),
            findings: vec![finding(DeclarationKind::Class, None, "A")],
            classes: vec![],
        });
        let mut other = ScanReport::new();
        other.add_file(FileScan::default());
        other.add_error(
            "b.php".to_string(),
            ScanError::Parse(ParseError::UnterminatedComment { line: 1 }),
        );
        report.merge(other);

        assert_eq!(report.scanned(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.finding_count(), 1);
        assert!(report.has_findings());
        assert_eq!(report.count(DeclarationKind::Class), 1);
        assert_eq!(report.count(DeclarationKind::Method), 0);
    }
}
