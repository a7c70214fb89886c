//! Post-collection graph analysis: bounded depth and cycle enumeration.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use super::collector::GraphNode;
use super::types::OrderedMap;

/// A closed walk along dependency edges (first id equals last id).
///
/// Equality and hashing are on the id sequence; the `"a -> b -> a"` text
/// form exists only at the serialization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CycleRecord {
    ids: Vec<String>,
}

impl CycleRecord {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Rotates the walk so the smallest id leads. Rotations of the same
    /// cycle share one canonical form.
    pub fn canonical(&self) -> Self {
        if self.ids.len() < 2 {
            return self.clone();
        }
        let ring = &self.ids[..self.ids.len() - 1];
        let pivot = ring
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map_or(0, |(i, _)| i);
        let mut rotated: Vec<String> = ring[pivot..]
            .iter()
            .chain(ring[..pivot].iter())
            .cloned()
            .collect();
        rotated.push(ring[pivot].clone());
        Self { ids: rotated }
    }

    pub fn render(&self) -> String {
        self.ids.join(" -> ")
    }
}

impl fmt::Display for CycleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for CycleRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

/// Depth and cycle pass over a collected dependency tree.
///
/// Both walks start from every id in the tree, not only entries, so a
/// cycle is recorded once per node from which it is entered. That favours
/// visibility over deduplication; `dedup_cycles` collapses rotations when
/// a single record per logical cycle is wanted.
#[derive(Debug, Clone, Copy)]
pub struct GraphAnalyzer {
    max_depth: u32,
    dedup_cycles: bool,
}

impl GraphAnalyzer {
    pub fn new(max_depth: u32, dedup_cycles: bool) -> Self {
        Self {
            max_depth,
            dedup_cycles,
        }
    }

    /// Memoizes a bounded depth into every node and returns the cycles
    /// discovered, in discovery order.
    pub fn analyze(&self, tree: &mut OrderedMap<GraphNode>) -> Vec<CycleRecord> {
        let ids: Vec<String> = tree.keys().map(str::to_string).collect();

        for id in &ids {
            let depth = self.bounded_depth(tree, id);
            if let Some(node) = tree.get_mut(id) {
                node.depth = depth;
            }
        }

        let mut seen: HashSet<CycleRecord> = HashSet::new();
        let mut cycles = Vec::new();
        for id in &ids {
            self.cycles_from(tree, id, &mut seen, &mut cycles);
        }
        cycles
    }

    /// Longest bounded walk below `root`, following children.
    ///
    /// An explicit frame stack replaces recursion so adversarial graphs
    /// cannot blow the native call stack. Termination comes from the depth
    /// budget alone, never from global visited membership: the same node
    /// may legitimately be walked again along a different branch. A node
    /// already on the current path contributes its closing edge and stops
    /// that branch.
    fn bounded_depth<'t>(&self, tree: &'t OrderedMap<GraphNode>, root: &'t str) -> u32 {
        if self.max_depth == 0 {
            return 0;
        }

        struct Frame<'a> {
            id: &'a str,
            next: usize,
            best: u32,
        }

        let mut stack = vec![Frame {
            id: root,
            next: 0,
            best: 0,
        }];
        let mut on_path: HashSet<&str> = HashSet::new();
        on_path.insert(root);

        loop {
            let used = (stack.len() - 1) as u32;
            let (id, next) = match stack.last() {
                Some(top) => (top.id, top.next),
                None => return 0,
            };
            let children: &[String] = tree.get(id).map_or(&[], |n| n.children.as_slice());

            if used >= self.max_depth || next >= children.len() {
                let frame = match stack.pop() {
                    Some(frame) => frame,
                    None => return 0,
                };
                on_path.remove(frame.id);
                match stack.last_mut() {
                    Some(parent) => parent.best = parent.best.max(frame.best + 1),
                    None => return frame.best,
                }
                continue;
            }

            let child = children[next].as_str();
            if let Some(top) = stack.last_mut() {
                top.next += 1;
                if on_path.contains(child) {
                    top.best = top.best.max(1);
                    continue;
                }
            }
            on_path.insert(child);
            stack.push(Frame {
                id: child,
                next: 0,
                best: 0,
            });
        }
    }

    /// Path-tracked DFS from one starting node. A repeat of an id already
    /// on the path records the sub-walk from its first occurrence through
    /// the repeat; a per-start visited set stops re-exploration.
    fn cycles_from<'t>(
        &self,
        tree: &'t OrderedMap<GraphNode>,
        start: &'t str,
        seen: &mut HashSet<CycleRecord>,
        out: &mut Vec<CycleRecord>,
    ) {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut work: Vec<(&str, Vec<&str>)> = vec![(start, Vec::new())];

        while let Some((id, path)) = work.pop() {
            if let Some(pos) = path.iter().position(|p| *p == id) {
                let mut walk: Vec<String> = path[pos..].iter().map(|p| p.to_string()).collect();
                walk.push(id.to_string());
                let record = if self.dedup_cycles {
                    CycleRecord::new(walk).canonical()
                } else {
                    CycleRecord::new(walk)
                };
                if seen.insert(record.clone()) {
                    out.push(record);
                }
                continue;
            }

            if !visited.insert(id) {
                continue;
            }
            let mut next_path = path;
            next_path.push(id);
            if let Some(node) = tree.get(id) {
                for child in node.children.iter().rev() {
                    work.push((child.as_str(), next_path.clone()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collector::{Collector, CollectorPolicy};
    use crate::core::scope::AcceptAll;
    use crate::core::types::ModuleDescriptor;

    fn chain(edges: &[(&str, &[&str])]) -> OrderedMap<GraphNode> {
        let mut collector = Collector::new(CollectorPolicy::default());
        for (id, imports) in edges {
            collector.record_module(
                ModuleDescriptor {
                    id: id.to_string(),
                    static_imports: imports.iter().map(|s| s.to_string()).collect(),
                    ..Default::default()
                },
                &AcceptAll,
            );
        }
        collector.tree().clone()
    }

    fn depth_of(tree: &OrderedMap<GraphNode>, id: &str) -> u32 {
        tree.get(id).map_or(u32::MAX, |n| n.depth)
    }

    #[test]
    fn test_depth_of_acyclic_chain() {
        let mut tree = chain(&[("entry", &["a"]), ("a", &["b"]), ("b", &[])]);
        GraphAnalyzer::new(5, false).analyze(&mut tree);

        assert_eq!(depth_of(&tree, "b"), 0);
        assert_eq!(depth_of(&tree, "a"), 1);
        assert_eq!(depth_of(&tree, "entry"), 2);
    }

    #[test]
    fn test_depth_takes_max_across_branches() {
        // entry -> a -> b -> c and entry -> c: c must be reachable twice.
        let mut tree = chain(&[
            ("entry", &["a", "c"]),
            ("a", &["b"]),
            ("b", &["c"]),
            ("c", &[]),
        ]);
        GraphAnalyzer::new(5, false).analyze(&mut tree);

        assert_eq!(depth_of(&tree, "entry"), 3);
    }

    #[test]
    fn test_depth_truncated_by_cap() {
        let mut tree = chain(&[
            ("m0", &["m1"]),
            ("m1", &["m2"]),
            ("m2", &["m3"]),
            ("m3", &["m4"]),
            ("m4", &[]),
        ]);
        GraphAnalyzer::new(2, false).analyze(&mut tree);

        assert_eq!(depth_of(&tree, "m0"), 2);
        assert_eq!(depth_of(&tree, "m3"), 1);
    }

    #[test]
    fn test_zero_cap_keeps_initial_depth() {
        let mut tree = chain(&[("a", &["b"]), ("b", &[])]);
        GraphAnalyzer::new(0, false).analyze(&mut tree);

        assert_eq!(depth_of(&tree, "a"), 0);
        assert_eq!(depth_of(&tree, "b"), 0);
    }

    #[test]
    fn test_cycle_depth_halted_by_cap_only() {
        let mut tree = chain(&[("a", &["b"]), ("b", &["a"])]);
        GraphAnalyzer::new(3, false).analyze(&mut tree);

        assert_eq!(depth_of(&tree, "a"), 2);
        assert_eq!(depth_of(&tree, "b"), 2);
    }

    #[test]
    fn test_cycles_recorded_per_starting_node() {
        let mut tree = chain(&[("a", &["b"]), ("b", &["a"])]);
        let cycles = GraphAnalyzer::new(3, false).analyze(&mut tree);

        let rendered: Vec<String> = cycles.iter().map(CycleRecord::render).collect();
        assert_eq!(rendered, vec!["a -> b -> a", "b -> a -> b"]);
    }

    #[test]
    fn test_dedup_collapses_rotations() {
        let mut tree = chain(&[("b", &["a"]), ("a", &["b"])]);
        let cycles = GraphAnalyzer::new(3, true).analyze(&mut tree);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].render(), "a -> b -> a");
    }

    #[test]
    fn test_self_loop() {
        let mut tree = chain(&[("a", &["a"])]);
        let cycles = GraphAnalyzer::new(3, false).analyze(&mut tree);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].render(), "a -> a");
        assert_eq!(depth_of(&tree, "a"), 1);
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let mut tree = chain(&[("entry", &["a"]), ("a", &["b"]), ("b", &[])]);
        let cycles = GraphAnalyzer::new(3, false).analyze(&mut tree);
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_cycle_record_serializes_as_string() {
        let record = CycleRecord::new(vec!["a".into(), "b".into(), "a".into()]);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#""a -> b -> a""#);
    }
}
