//! Project-membership classification for module ids.

use std::path::Path;

/// Strategy deciding whether an id belongs to the analyzed project.
///
/// Injected into the pipeline so alternate rules (allow-lists, glob
/// patterns, manifest lookups) can replace the default heuristic without
/// touching graph logic.
pub trait ScopePolicy {
    fn is_project(&self, id: &str) -> bool;
}

/// Treats every id as project-owned.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ScopePolicy for AcceptAll {
    fn is_project(&self, _id: &str) -> bool {
        true
    }
}

/// Substring heuristic over module ids.
///
/// Advisory only, not a guaranteed-correct classifier: an id counts as
/// project-owned when it mentions a source directory segment, sits under
/// the project root, or is a relative path that does not point into a
/// dependency directory.
#[derive(Debug, Clone)]
pub struct HeuristicScope {
    root_prefix: String,
}

const SOURCE_SEGMENT: &str = "/src/";
const VENDOR_SEGMENT: &str = "node_modules";

impl HeuristicScope {
    pub fn new(root: &Path) -> Self {
        Self {
            root_prefix: root.to_string_lossy().to_string(),
        }
    }
}

impl ScopePolicy for HeuristicScope {
    fn is_project(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        id.contains(SOURCE_SEGMENT)
            || (!self.root_prefix.is_empty() && id.starts_with(&self.root_prefix))
            || (id.starts_with('.') && !id.contains(VENDOR_SEGMENT))
    }
}
