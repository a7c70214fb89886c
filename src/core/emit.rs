//! Artifact emission boundary.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// A named build artifact handed over for writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub content: String,
}

/// Host capability for registering build artifacts.
pub trait ArtifactSink {
    fn emit(&mut self, artifact: Artifact) -> Result<()>;
}

/// Writes artifacts into a directory on disk.
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for FileSink {
    fn emit(&mut self, artifact: Artifact) -> Result<()> {
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("Failed to create output directory: {:?}", self.dir))?;
        }
        let path = self.dir.join(&artifact.file_name);
        fs::write(&path, artifact.content)
            .with_context(|| format!("Failed to write artifact: {:?}", path))?;
        Ok(())
    }
}

/// Collects artifacts in memory; used by tests and embedding hosts.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: Vec<Artifact>,
}

impl ArtifactSink for MemorySink {
    fn emit(&mut self, artifact: Artifact) -> Result<()> {
        self.artifacts.push(artifact);
        Ok(())
    }
}
