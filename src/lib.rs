//! docblock-checker - find PHP declarations missing a docblock.
//!
//! Every class, method and anonymous function declared in a class body is
//! expected to be directly preceded by a `/** ... */` documentation comment.
//! Declarations without one are reported.
//!
//! # Architecture
//!
//! - `parser`: PHP tokenizer (comments, strings, heredocs, attributes)
//! - `detect`: Declaration scanner, file collection and the parallel runner
//! - `config`: YAML configuration file
//! - `report`: Output formatting (pretty log, JSON)
//! - `cli`: Command-line interface

pub mod cli;
pub mod config;
pub mod detect;
pub mod parser;
pub mod report;

pub use config::Config;
pub use detect::{
    scan_file, scan_source, ClassStatus, DeclarationKind, FileScan, Finding, Runner, ScanConfig,
    ScanError, ScanReport,
};
pub use parser::{tokenize, ParseError, Token, TokenKind, Tokenizer};
