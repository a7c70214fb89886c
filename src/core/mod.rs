//! Core pipeline for depmap
//!
//! Collection, analysis, report assembly and artifact emission. All state
//! lives in one `DependencyMapper` per build pass.

pub mod analyzer;
pub mod collector;
pub mod emit;
pub mod pipeline;
pub mod report;
pub mod scope;
pub mod types;
