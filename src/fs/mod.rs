use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Walks a directory honoring gitignore rules plus user ignore globs.
pub fn walk_directory(path: &Path, ignore_patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut builder = WalkBuilder::new(path);

    // In the override builder a plain glob whitelists; "!glob" ignores.
    // User input is "globs to ignore", so each pattern gets negated.
    let mut override_builder = ignore::overrides::OverrideBuilder::new(path);
    for pattern in ignore_patterns {
        override_builder.add(&format!("!{}", pattern))?;
    }
    let overrides = override_builder.build()?;

    builder.overrides(overrides);
    builder.standard_filters(true);

    let mut files = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => eprintln!("Error walking directory: {}", err),
        }
    }

    files.sort();
    Ok(files)
}
