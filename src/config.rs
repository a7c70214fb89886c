use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration for depmap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepmapConfig {
    /// Project root to analyze
    pub path: PathBuf,
    /// Path of the emitted dependency map
    pub output: PathBuf,
    /// Glob patterns excluded from the walk (e.g. "*.min.js")
    pub ignore_patterns: Vec<String>,
    /// Globs marking modules as entry points, matched against root-relative paths
    pub entry_patterns: Vec<String>,
    /// Inclusion globs for chunk output names; empty accepts all
    pub filter_patterns: Vec<String>,
    /// Record edges pointing outside the project
    pub include_external: bool,
    /// Restrict the entire report to project-owned modules
    pub project_only: bool,
    /// Depth traversal cap
    pub max_depth: u32,
    /// Collapse rotations of the same cycle into one record
    pub dedup_cycles: bool,
    /// Verbose progress and summary on stdout
    pub verbose: bool,
}

impl DepmapConfig {
    /// Validates the configuration, ensuring the path exists.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.path.exists() {
            anyhow::bail!("Path does not exist: {:?}", self.path);
        }
        Ok(())
    }

    /// Attempts to load configuration from `depmap.toml` in the current directory.
    pub fn load_from_file() -> Option<Self> {
        std::fs::read_to_string("depmap.toml")
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
    }
}

impl Default for DepmapConfig {
    fn default() -> Self {
        let ignore_defaults = vec![
            // Version control
            ".git",
            ".hg",
            ".svn",
            // Dependency and build output
            "node_modules",
            "target",
            "dist",
            "build",
            "out",
            "vendor",
            "venv",
            ".venv",
            "__pycache__",
            // Lockfiles
            "package-lock.json",
            "yarn.lock",
            "pnpm-lock.yaml",
            "Cargo.lock",
            // Generated bundles
            "*.min.js",
            "*.map",
            // System
            ".DS_Store",
        ];

        Self {
            path: PathBuf::from("."),
            output: PathBuf::from("dependency-map.json"),
            ignore_patterns: ignore_defaults.into_iter().map(String::from).collect(),
            entry_patterns: vec![
                "src/main.*".to_string(),
                "src/index.*".to_string(),
                "main.*".to_string(),
                "index.*".to_string(),
            ],
            filter_patterns: Vec::new(),
            include_external: true,
            project_only: false,
            max_depth: crate::core::pipeline::DEFAULT_MAX_DEPTH,
            dedup_cycles: false,
            verbose: false,
        }
    }
}
