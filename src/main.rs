use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use depmap::{DepmapConfig, run};

#[derive(Parser, Debug)]
#[command(author, version, about = "Module dependency graph analyzer", long_about = None)]
struct Args {
    /// Directory to analyze
    path: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Add ignore pattern (glob)
    #[arg(long)]
    ignore: Vec<String>,

    /// Mark modules matching this glob as entry points
    #[arg(long)]
    entry: Vec<String>,

    /// Only process chunk output names matching this glob
    #[arg(long)]
    filter: Vec<String>,

    /// Skip edges that point outside the project
    #[arg(long)]
    no_external: bool,

    /// Restrict the entire report to project-owned modules
    #[arg(long)]
    project_only: bool,

    /// Depth traversal cap
    #[arg(long)]
    max_depth: Option<u32>,

    /// Collapse rotations of the same cycle into one record
    #[arg(long)]
    dedup_cycles: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load from file or default
    let mut config = DepmapConfig::load_from_file().unwrap_or_default();

    // 2. Override with CLI args
    if let Some(p) = args.path {
        config.path = p;
    }
    if let Some(o) = args.output {
        config.output = o;
    }
    if !args.ignore.is_empty() {
        // CLI ignores ADD to config ignores
        config.ignore_patterns.extend(args.ignore);
    }
    if !args.entry.is_empty() {
        config.entry_patterns = args.entry;
    }
    if !args.filter.is_empty() {
        config.filter_patterns = args.filter;
    }
    if args.no_external {
        config.include_external = false;
    }
    if args.project_only {
        config.project_only = true;
    }
    if let Some(d) = args.max_depth {
        config.max_depth = d;
    }
    if args.dedup_cycles {
        config.dedup_cycles = true;
    }
    if args.verbose {
        config.verbose = true;
    }

    run(config)
}
