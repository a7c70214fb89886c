//! Filesystem host for the mapping pipeline.
//!
//! Walks a source tree, extracts and resolves imports, feeds one module
//! descriptor per file into a `DependencyMapper`, and emits the report.
//! The bundler-facing hooks live in `core::pipeline`; this module is the
//! standalone equivalent for analyzing a checkout directly.

use std::fs as std_fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::DepmapConfig;
use crate::core::emit::FileSink;
use crate::core::pipeline::{ChunkFilter, DEFAULT_OUTPUT_FILE, DependencyMapper, PipelineOptions};
use crate::core::report::AnalysisReport;
use crate::core::scope::HeuristicScope;
use crate::core::types::ModuleDescriptor;
use crate::fs::walk_directory;
use crate::parse::imports::parse_module;
use crate::parse::resolve::resolve_import;

const SUPPORTED_EXTENSIONS: &[&str] = &["rs", "js", "jsx", "ts", "tsx", "py", "go"];

/// Main entry point for the depmap CLI.
///
/// Collection is strictly sequential: the pipeline mutates shared maps
/// without locking, which is sound only because each file is handed over
/// one at a time.
pub fn run(config: DepmapConfig) -> Result<()> {
    config.validate()?;
    let root = config
        .path
        .canonicalize()
        .with_context(|| format!("Failed to find directory: {:?}", config.path))?;

    let paths = discover_sources(&root, &config.ignore_patterns)?;
    if config.verbose {
        println!("Found {} source files.", paths.len());
    }

    let entry_globs = compile_globs(&config.entry_patterns)?;
    let mut mapper = DependencyMapper::new(
        pipeline_options(&config)?,
        Box::new(HeuristicScope::new(&root)),
    );

    for path in &paths {
        let descriptor = match describe_file(path, &root, &entry_globs) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                eprintln!("Skipping {:?}: {}", path, err);
                continue;
            }
        };
        if config.verbose {
            println!("Collected: {}", descriptor.id);
        }
        mapper.record_module(descriptor);
    }

    let out_dir = config
        .output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut sink = FileSink::new(out_dir);
    let report = mapper.finish(&mut sink)?;

    if config.verbose {
        print_report(&report);
    }
    println!("Dependency map written: {:?}", config.output);
    Ok(())
}

/// Walks the tree and keeps files the parser understands.
pub fn discover_sources(root: &Path, ignore_patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = walk_directory(root, ignore_patterns)?;
    paths.retain(|p| {
        p.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
    });
    Ok(paths)
}

fn pipeline_options(config: &DepmapConfig) -> Result<PipelineOptions> {
    let output_file = config
        .output
        .file_name()
        .map_or_else(|| DEFAULT_OUTPUT_FILE.to_string(), |n| n.to_string_lossy().to_string());

    let chunk_filter = if config.filter_patterns.is_empty() {
        None
    } else {
        let patterns = compile_globs(&config.filter_patterns)?;
        Some(Box::new(move |name: &str| patterns.iter().any(|p| p.matches(name))) as ChunkFilter)
    };

    Ok(PipelineOptions {
        output_file,
        include_external: config.include_external,
        project_only: config.project_only,
        max_depth: config.max_depth,
        dedup_cycles: config.dedup_cycles,
        chunk_filter,
    })
}

fn compile_globs(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid glob pattern: {}", p)))
        .collect()
}

/// Builds the module descriptor for one source file.
fn describe_file(
    path: &Path,
    root: &Path,
    entry_globs: &[glob::Pattern],
) -> Result<ModuleDescriptor> {
    let bytes = std_fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let content = String::from_utf8_lossy(&bytes).to_string();
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    let parsed = parse_module(&content, extension);

    let static_imports = link_imports(&parsed.static_imports, path, root);
    let dynamic_imports = link_imports(&parsed.dynamic_imports, path, root);

    let relative = path.strip_prefix(root).unwrap_or(path);
    let is_entry = entry_globs.iter().any(|g| g.matches_path(relative));

    Ok(ModuleDescriptor {
        id: path.to_string_lossy().to_string(),
        code: Some(content),
        static_imports,
        dynamic_imports,
        exports: parsed.exports,
        is_entry,
    })
}

/// Maps specifiers to repository paths where resolution succeeds;
/// everything else stays in the graph as an external id.
fn link_imports(specifiers: &[String], current: &Path, root: &Path) -> Vec<String> {
    specifiers
        .iter()
        .map(|specifier| match resolve_import(specifier, current, root) {
            Some(path) => {
                let path = path.canonicalize().unwrap_or(path);
                path.to_string_lossy().to_string()
            }
            None => specifier.clone(),
        })
        .collect()
}

fn print_report(report: &AnalysisReport) {
    println!();
    println!("Dependency analysis report");
    println!("{}", "=".repeat(50));
    println!("Total modules: {}", report.summary.total_modules);
    println!(
        "Total size: {:.2} KB",
        report.summary.total_size_bytes as f64 / 1024.0
    );
    println!("Entry points: {}", report.summary.entry_point_count);

    if !report.summary.circular_dependencies.is_empty() {
        println!();
        println!("Circular dependencies detected:");
        for cycle in &report.summary.circular_dependencies {
            println!("  {}", cycle);
        }
    }

    println!();
    println!("Largest modules:");
    for entry in &report.largest_modules {
        println!("  {}: {} KB", entry.id, entry.size_kb);
    }

    println!();
    println!("Modules by depth:");
    for (depth, ids) in &report.modules_by_depth {
        println!("  depth {}: {} modules", depth, ids.len());
    }
}
