//! Report assembly over collector and analyzer output.

use std::collections::BTreeMap;

use serde::Serialize;

use super::analyzer::CycleRecord;
use super::collector::{GraphNode, ModuleRecord};
use super::scope::ScopePolicy;
use super::types::OrderedMap;

pub const LARGEST_MODULES_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_modules: usize,
    pub total_size_bytes: usize,
    pub circular_dependencies: Vec<CycleRecord>,
    pub entry_point_count: usize,
}

/// Ranking entry; `size` stays in bytes, the kilobyte string is rounded to
/// two decimals for human consumption.
#[derive(Debug, Clone, Serialize)]
pub struct SizeEntry {
    pub id: String,
    pub size: usize,
    #[serde(rename = "sizeKB")]
    pub size_kb: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: ReportSummary,
    pub modules: OrderedMap<ModuleRecord>,
    pub dependency_tree: OrderedMap<GraphNode>,
    pub largest_modules: Vec<SizeEntry>,
    pub modules_by_depth: BTreeMap<u32, Vec<String>>,
}

impl AnalysisReport {
    /// Restricts an already-built report to project-owned ids. Depth groups
    /// left empty are dropped. Applying this twice yields the same report.
    pub fn retain_project_scope(&mut self, scope: &dyn ScopePolicy) {
        self.modules.retain(|id| scope.is_project(id));
        self.dependency_tree.retain(|id| scope.is_project(id));
        self.largest_modules.retain(|entry| scope.is_project(&entry.id));
        for ids in self.modules_by_depth.values_mut() {
            ids.retain(|id| scope.is_project(id));
        }
        self.modules_by_depth.retain(|_, ids| !ids.is_empty());
    }
}

/// Aggregates records, the analyzed tree and the cycle list into the final
/// report structure.
pub fn build_report(
    records: &OrderedMap<ModuleRecord>,
    tree: &OrderedMap<GraphNode>,
    cycles: Vec<CycleRecord>,
) -> AnalysisReport {
    let summary = ReportSummary {
        total_modules: records.len(),
        total_size_bytes: records.iter().map(|(_, r)| r.size).sum(),
        circular_dependencies: cycles,
        entry_point_count: records.iter().filter(|(_, r)| r.is_entry).count(),
    };

    AnalysisReport {
        summary,
        largest_modules: largest_modules(records, LARGEST_MODULES_LIMIT),
        modules_by_depth: group_by_depth(tree),
        modules: records.clone(),
        dependency_tree: tree.clone(),
    }
}

/// Stable descending sort by size; ties keep record insertion order.
fn largest_modules(records: &OrderedMap<ModuleRecord>, limit: usize) -> Vec<SizeEntry> {
    let mut entries: Vec<SizeEntry> = records
        .iter()
        .map(|(id, record)| SizeEntry {
            id: id.to_string(),
            size: record.size,
            size_kb: format!("{:.2}", record.size as f64 / 1024.0),
        })
        .collect();
    entries.sort_by(|a, b| b.size.cmp(&a.size));
    entries.truncate(limit);
    entries
}

fn group_by_depth(tree: &OrderedMap<GraphNode>) -> BTreeMap<u32, Vec<String>> {
    let mut groups: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for (id, node) in tree.iter() {
        groups.entry(node.depth).or_default().push(id.to_string());
    }
    groups
}
