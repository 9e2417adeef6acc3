//! Command-line interface for docblock-checker.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{self, Config, DEFAULT_TEMPLATE};
use crate::detect::{collect_files, split_exclude_list, Runner, SourceFile};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Find PHP classes and methods that are missing a docblock.
///
/// Every class, method and anonymous function declared inside a class must
/// be directly preceded by a `/** ... */` comment. Declarations without one
/// are reported and the command exits non-zero.
#[derive(Parser)]
#[command(name = "docblock-checker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check PHP files for missing docblocks
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Individual files to check
    pub files: Vec<PathBuf>,

    /// Directory to scan recursively
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Comma-separated files or directories to exclude, relative to --directory
    #[arg(short = 'x', long)]
    pub exclude: Option<String>,

    /// Don't check classes for docblocks
    #[arg(long)]
    pub skip_classes: bool,

    /// Don't check methods (or anonymous functions) for docblocks
    #[arg(long)]
    pub skip_methods: bool,

    /// Don't check anonymous functions for docblocks
    #[arg(long)]
    pub skip_anonymous_functions: bool,

    /// Output findings as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Path to configuration file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only print missing docblocks, not classes that pass
    #[arg(short, long)]
    pub quiet: bool,

    /// Log each scanned file to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = ".docblock-checker.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl Commands {
    /// Whether debug logging was requested.
    pub fn is_verbose(&self) -> bool {
        match self {
            Commands::Check(args) => args.verbose,
            Commands::Init(_) => false,
        }
    }
}

/// Load the configuration file and apply command-line overrides.
pub fn resolve_config(args: &CheckArgs) -> anyhow::Result<Config> {
    let path = match &args.config {
        Some(p) => Some(p.clone()),
        None => config::discover(&std::env::current_dir()?),
    };

    let mut config = match &path {
        Some(p) => {
            debug!(path = %p.display(), "loading configuration");
            Config::parse_file(p)
                .map_err(|e| anyhow::anyhow!("failed to load {}: {}", p.display(), e))?
        }
        None => Config::default(),
    };

    config.scan.skip_classes |= args.skip_classes;
    config.scan.skip_methods |= args.skip_methods;
    config.scan.skip_anonymous_functions |= args.skip_anonymous_functions;
    if let Some(list) = &args.exclude {
        config.exclude.extend(split_exclude_list(list));
    }

    config::validate(&config)?;
    Ok(config)
}

/// Gather the files to check: the directory walk followed by explicit files.
///
/// With a directory, relative explicit files are read from inside it but
/// reported as typed.
fn gather_files(
    directory: Option<&Path>,
    explicit: &[PathBuf],
    config: &Config,
) -> anyhow::Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    if let Some(dir) = directory {
        let excludes = config.exclude_set()?;
        files.extend(collect_files(dir, &config.extensions, &excludes)?);
    }
    files.extend(explicit.iter().map(|file| match directory {
        Some(dir) if file.is_relative() => SourceFile {
            path: dir.join(file),
            ..SourceFile::explicit(file)
        },
        _ => SourceFile::explicit(file),
    }));

    Ok(files)
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    if args.directory.is_none() && args.files.is_empty() {
        eprintln!("Error: nothing to check, pass --directory or one or more files");
        return Ok(EXIT_ERROR);
    }

    if let Some(dir) = &args.directory {
        if !dir.is_dir() {
            eprintln!("Error: not a directory: {}", dir.display());
            return Ok(EXIT_ERROR);
        }
    }

    let config = match resolve_config(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: invalid configuration: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = gather_files(args.directory.as_deref(), &args.files, &config)?;
    if files.is_empty() {
        eprintln!("Warning: no files to check");
    }

    let report = Runner::new(config.scan).run(&files);

    if args.json {
        report::write_json(&report)?;
    } else {
        report::write_pretty(&report, !args.quiet);
    }

    if report.has_findings() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Use --force to overwrite it");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_TEMPLATE) {
        eprintln!("Error: failed to write configuration: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!(
        "  2. Run: docblock-checker check --directory . --config {}",
        args.output.display()
    );

    Ok(EXIT_SUCCESS)
}
