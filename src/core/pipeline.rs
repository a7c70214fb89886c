//! One dependency-mapping build pass, from collection hooks to emission.

use anyhow::Result;

use super::analyzer::GraphAnalyzer;
use super::collector::{Collector, CollectorPolicy};
use super::emit::{Artifact, ArtifactSink};
use super::report::{self, AnalysisReport};
use super::scope::ScopePolicy;
use super::types::{ChunkDescriptor, ModuleDescriptor};

pub const DEFAULT_OUTPUT_FILE: &str = "dependency-map.json";
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Predicate over chunk output names.
pub type ChunkFilter = Box<dyn Fn(&str) -> bool + Send>;

pub struct PipelineOptions {
    /// Artifact name registered at end of build.
    pub output_file: String,
    /// Record edges whose target lies outside the project.
    pub include_external: bool,
    /// Restrict the entire report to project-owned ids.
    pub project_only: bool,
    /// Depth traversal cap; the only brake on densely cyclic graphs.
    pub max_depth: u32,
    /// Collapse rotations of the same cycle to a single record.
    pub dedup_cycles: bool,
    /// Which chunk output names to process; `None` accepts all.
    pub chunk_filter: Option<ChunkFilter>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            include_external: true,
            project_only: false,
            max_depth: DEFAULT_MAX_DEPTH,
            dedup_cycles: false,
            chunk_filter: None,
        }
    }
}

/// The per-build aggregator. Hosts create one instance per build
/// invocation and call the hooks strictly sequentially; nothing is shared
/// between concurrent builds. `finish` consumes the mapper, so analysis
/// runs and the artifact is emitted exactly once.
pub struct DependencyMapper {
    options: PipelineOptions,
    scope: Box<dyn ScopePolicy>,
    collector: Collector,
}

impl DependencyMapper {
    pub fn new(options: PipelineOptions, scope: Box<dyn ScopePolicy>) -> Self {
        let collector = Collector::new(CollectorPolicy {
            include_external: options.include_external,
            project_only: options.project_only,
        });
        Self {
            options,
            scope,
            collector,
        }
    }

    /// Module-resolved hook.
    pub fn record_module(&mut self, descriptor: ModuleDescriptor) {
        self.collector.record_module(descriptor, self.scope.as_ref());
    }

    /// Chunk-rendered hook. Output names failing the configured filter are
    /// skipped; the code under analysis is never transformed.
    pub fn record_chunk(&mut self, descriptor: ChunkDescriptor) {
        if let Some(filter) = &self.options.chunk_filter {
            if !filter(&descriptor.file_name) {
                return;
            }
        }
        self.collector.record_chunk(descriptor, self.scope.as_ref());
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    /// Build-finished hook: analyzes the accumulated graph, assembles the
    /// report, and registers it with the host as a single JSON artifact.
    pub fn finish(mut self, sink: &mut dyn ArtifactSink) -> Result<AnalysisReport> {
        let analyzer = GraphAnalyzer::new(self.options.max_depth, self.options.dedup_cycles);
        let cycles = analyzer.analyze(self.collector.tree_mut());

        let mut report = report::build_report(self.collector.records(), self.collector.tree(), cycles);
        if self.options.project_only {
            report.retain_project_scope(self.scope.as_ref());
        }

        let content = serde_json::to_string_pretty(&report)?;
        sink.emit(Artifact {
            file_name: self.options.output_file.clone(),
            content,
        })?;
        Ok(report)
    }
}
