//! Detection of declarations missing a docblock.

mod docblocks;
mod files;
mod runner;
mod types;

pub use docblocks::{scan_file, scan_source};
pub use files::{collect_files, split_exclude_list, ExcludeSet, SourceFile};
pub use runner::Runner;
pub use types::{
    ClassStatus, DeclarationKind, FileError, FileScan, Finding, ScanConfig, ScanError, ScanReport,
    ANONYMOUS_FUNCTION,
};
