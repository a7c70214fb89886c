//! Collection phase: module and chunk descriptors in, records and adjacency out.
//!
//! The collector is the aggregator for one build pass. Hosts hand it a
//! descriptor per module/chunk, strictly sequentially; it maintains the
//! record map and the children/parents tree the analyzer later walks.

use serde::Serialize;

use super::scope::ScopePolicy;
use super::types::{ChunkDescriptor, ModuleDescriptor, OrderedMap};

/// Edge-recording behaviour.
#[derive(Debug, Clone, Copy)]
pub struct CollectorPolicy {
    /// Record edges whose target is classified outside the project.
    pub include_external: bool,
    /// Skip external modules entirely, not just their edges.
    pub project_only: bool,
}

impl Default for CollectorPolicy {
    fn default() -> Self {
        Self {
            include_external: true,
            project_only: false,
        }
    }
}

/// Everything known about one module or chunk, keyed by id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub id: String,
    pub size: usize,
    pub static_imports: Vec<String>,
    pub dynamic_imports: Vec<String>,
    pub exports: Vec<String>,
    pub is_entry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facade_module_id: Option<String>,
}

/// Adjacency entry for one id. Created lazily the first time the id shows
/// up as either end of an edge, whether or not a record exists for it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphNode {
    pub children: Vec<String>,
    pub parents: Vec<String>,
    pub depth: u32,
}

/// Per-build aggregation of module records and the dependency tree.
#[derive(Debug)]
pub struct Collector {
    policy: CollectorPolicy,
    records: OrderedMap<ModuleRecord>,
    tree: OrderedMap<GraphNode>,
}

impl Collector {
    pub fn new(policy: CollectorPolicy) -> Self {
        Self {
            policy,
            records: OrderedMap::new(),
            tree: OrderedMap::new(),
        }
    }

    pub fn records(&self) -> &OrderedMap<ModuleRecord> {
        &self.records
    }

    pub fn tree(&self) -> &OrderedMap<GraphNode> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut OrderedMap<GraphNode> {
        &mut self.tree
    }

    /// Records a resolved module. A later descriptor for the same id
    /// replaces the record wholesale; nothing here is an error.
    pub fn record_module(&mut self, descriptor: ModuleDescriptor, scope: &dyn ScopePolicy) {
        if descriptor.id.is_empty() {
            return;
        }
        if self.policy.project_only && !scope.is_project(&descriptor.id) {
            return;
        }

        let record = ModuleRecord {
            id: descriptor.id.clone(),
            size: descriptor.code.as_ref().map_or(0, String::len),
            static_imports: descriptor.static_imports.clone(),
            dynamic_imports: descriptor.dynamic_imports,
            exports: descriptor.exports,
            is_entry: descriptor.is_entry,
            facade_module_id: None,
        };
        self.records.insert(descriptor.id.clone(), record);

        self.ensure_node(&descriptor.id);
        for target in &descriptor.static_imports {
            self.record_edge(&descriptor.id, target, scope);
        }
    }

    /// Records a rendered chunk. An existing record for the same output
    /// name (from an earlier resolution pass) gets its size, imports and
    /// entry flag overwritten in place. The chunk code is never rewritten.
    pub fn record_chunk(&mut self, descriptor: ChunkDescriptor, scope: &dyn ScopePolicy) {
        if descriptor.file_name.is_empty() {
            return;
        }
        if self.policy.project_only && !scope.is_project(&descriptor.file_name) {
            return;
        }

        let size = descriptor.code.as_ref().map_or(0, String::len);
        let imports: Vec<String> = descriptor
            .imports
            .iter()
            .filter(|target| !self.skip_target(target, scope))
            .cloned()
            .collect();

        if let Some(record) = self.records.get_mut(&descriptor.file_name) {
            record.size = size;
            record.static_imports = imports.clone();
            record.dynamic_imports = descriptor.dynamic_imports;
            record.is_entry = descriptor.is_entry;
        } else {
            let record = ModuleRecord {
                id: descriptor.file_name.clone(),
                size,
                static_imports: imports.clone(),
                dynamic_imports: descriptor.dynamic_imports,
                exports: descriptor.exports,
                is_entry: descriptor.is_entry,
                facade_module_id: descriptor.facade_module_id,
            };
            self.records.insert(descriptor.file_name.clone(), record);
        }

        self.ensure_node(&descriptor.file_name);
        for target in &imports {
            self.record_edge(&descriptor.file_name, target, scope);
        }
    }

    fn skip_target(&self, id: &str, scope: &dyn ScopePolicy) -> bool {
        (self.policy.project_only || !self.policy.include_external) && !scope.is_project(id)
    }

    fn ensure_node(&mut self, id: &str) {
        self.tree.get_or_insert_with(id, GraphNode::default);
    }

    fn record_edge(&mut self, source: &str, target: &str, scope: &dyn ScopePolicy) {
        if self.skip_target(target, scope) {
            return;
        }
        self.ensure_node(source);
        self.ensure_node(target);
        if let Some(node) = self.tree.get_mut(source) {
            push_unique(&mut node.children, target);
        }
        if let Some(node) = self.tree.get_mut(target) {
            push_unique(&mut node.parents, source);
        }
    }
}

fn push_unique(list: &mut Vec<String>, id: &str) {
    if !list.iter().any(|existing| existing == id) {
        list.push(id.to_string());
    }
}
