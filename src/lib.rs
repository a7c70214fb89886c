pub mod config;
pub mod core;
pub mod fs;
pub mod parse;
pub mod runner;

// Re-export key items for convenience
pub use config::DepmapConfig;
pub use crate::core::analyzer::{CycleRecord, GraphAnalyzer};
pub use crate::core::collector::{Collector, CollectorPolicy, GraphNode, ModuleRecord};
pub use crate::core::emit::{Artifact, ArtifactSink, FileSink, MemorySink};
pub use crate::core::pipeline::{DependencyMapper, PipelineOptions};
pub use crate::core::report::AnalysisReport;
pub use crate::core::scope::{AcceptAll, HeuristicScope, ScopePolicy};
pub use crate::core::types::{ChunkDescriptor, ModuleDescriptor, OrderedMap};
pub use runner::run;
