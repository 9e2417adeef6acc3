//! Scan runner that checks a set of files and aggregates the results.

use rayon::prelude::*;
use tracing::{info, warn};

use super::docblocks::scan_file;
use super::files::SourceFile;
use super::types::{FileScan, ScanConfig, ScanError, ScanReport};

/// Executes the docblock scan against a set of files.
///
/// Files are scanned independently and in parallel; the report lists them
/// in the order given, so output does not depend on scheduling.
pub struct Runner {
    config: ScanConfig,
}

impl Runner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan every file. A file that cannot be read or tokenized is recorded
    /// as an error and contributes no findings.
    pub fn run(&self, files: &[SourceFile]) -> ScanReport {
        let results: Vec<Result<FileScan, ScanError>> = files
            .par_iter()
            .map(|file| scan_file(&file.path, &file.display, &self.config))
            .collect();

        let mut report = ScanReport::new();
        for (file, result) in files.iter().zip(results) {
            match result {
                Ok(scan) => report.add_file(scan),
                Err(error) => {
                    warn!(file = %file.display, %error, "skipping file");
                    report.add_error(file.display.clone(), error);
                }
            }
        }

        info!(
            scanned = report.scanned(),
            findings = report.finding_count(),
            skipped = report.errors.len(),
            "scan complete"
        );
        report
    }
}
