//! Collection of source files to scan.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

/// A file to scan, with the path shown in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub display: String,
}

impl SourceFile {
    /// A file named directly by the user; reported as given.
    pub fn explicit<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self {
            path: path.to_path_buf(),
            display: path.to_string_lossy().to_string(),
        }
    }
}

/// Paths (relative to the scanned directory) that must not be scanned.
///
/// Entries are glob patterns; a plain relative path is a pattern matching
/// exactly that file or directory. Excluding a directory prunes its subtree.
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    set: GlobSet,
}

impl ExcludeSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> anyhow::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = normalize_pattern(pattern.as_ref());
            if pattern.is_empty() {
                continue;
            }
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid exclude pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }

    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.set.is_match(relative)
    }
}

fn normalize_pattern(pattern: &str) -> &str {
    let pattern = pattern.trim();
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    pattern.trim_end_matches('/')
}

/// Split a comma-separated exclude list, trimming each entry.
pub fn split_exclude_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Recursively collect files under `root` with one of `extensions`.
///
/// Results are sorted by path so output is stable across platforms.
pub fn collect_files(
    root: &Path,
    extensions: &[String],
    excludes: &ExcludeSet,
) -> anyhow::Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            match e.path().strip_prefix(root) {
                Ok(relative) => !excludes.is_excluded(relative),
                Err(_) => true,
            }
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !extensions.iter().any(|allowed| allowed == ext) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        files.push(SourceFile {
            path: path.to_path_buf(),
            display: relative.to_string_lossy().replace('\\', "/"),
        });
    }

    Ok(files)
}
