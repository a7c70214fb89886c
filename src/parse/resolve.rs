//! Heuristic resolution of import specifiers to repository paths.

use std::path::{Path, PathBuf};

const SCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "d.ts"];
const INDEX_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Maps an import specifier to a path inside the repository, when one
/// exists on disk. Bare specifiers (package imports) and unresolvable
/// paths return `None` and stay in the graph as external ids.
pub fn resolve_import(import: &str, current_file: &Path, repo_root: &Path) -> Option<PathBuf> {
    let extension = current_file
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    match extension {
        "rs" => {
            // crate::utils::foo -> src/utils/foo.rs
            // mod foo -> current_dir/foo.rs or current_dir/foo/mod.rs
            let current_dir = current_file.parent().unwrap_or(repo_root);

            if let Some(suffix) = import.strip_prefix("crate::") {
                let suffix = suffix.replace("::", "/");
                let candidate = repo_root.join("src").join(format!("{}.rs", suffix));
                if candidate.is_file() {
                    return Some(candidate);
                }
                let candidate_mod = repo_root.join("src").join(&suffix).join("mod.rs");
                if candidate_mod.is_file() {
                    return Some(candidate_mod);
                }
            } else if !import.contains("::") {
                let candidate = current_dir.join(format!("{}.rs", import));
                if candidate.is_file() {
                    return Some(candidate);
                }
                let candidate_mod = current_dir.join(import).join("mod.rs");
                if candidate_mod.is_file() {
                    return Some(candidate_mod);
                }
            }
            // super:: resolution is not implemented.
        }
        "js" | "ts" | "jsx" | "tsx" => {
            // Source-root alias, as bundler configs commonly define it.
            if let Some(rest) = import.strip_prefix("@/") {
                return probe_script(&repo_root.join("src").join(rest));
            }
            // Relatives: ./foo, ../bar
            if import.starts_with('.') {
                let current_dir = current_file.parent().unwrap_or(repo_root);
                return probe_script(&current_dir.join(import));
            }
        }
        "py" => {
            // import foo.bar maps dots to slashes relative to root.
            let rel_path = import.replace('.', "/");
            let candidate = repo_root.join(format!("{}.py", rel_path));
            if candidate.is_file() {
                return Some(candidate);
            }
            let candidate_init = repo_root.join(rel_path).join("__init__.py");
            if candidate_init.is_file() {
                return Some(candidate_init);
            }
        }
        _ => {}
    }

    None
}

/// Tries a script path as written, then with each known extension, then as
/// a directory with an index file.
fn probe_script(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }
    for ext in SCRIPT_EXTENSIONS {
        let candidate = base.with_extension(ext);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    for ext in INDEX_EXTENSIONS {
        let candidate = base.join(format!("index.{}", ext));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_relative_js_import() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let src = temp.path().join("src");
        fs::create_dir_all(&src)?;
        fs::write(src.join("a.js"), "export const a = 1;")?;
        fs::write(src.join("index.js"), "import './a';")?;

        let resolved = resolve_import("./a", &src.join("index.js"), temp.path());
        assert_eq!(resolved, Some(src.join("./a").with_extension("js")));
        Ok(())
    }

    #[test]
    fn test_resolve_directory_index() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let widgets = temp.path().join("src").join("widgets");
        fs::create_dir_all(&widgets)?;
        fs::write(widgets.join("index.ts"), "export {};")?;
        let importer = temp.path().join("src").join("app.ts");
        fs::write(&importer, "import './widgets';")?;

        let resolved = resolve_import("./widgets", &importer, temp.path());
        assert_eq!(
            resolved.map(|p| p.file_name().map(|n| n.to_string_lossy().to_string())),
            Some(Some("index.ts".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_resolve_source_root_alias() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let components = temp.path().join("src").join("components");
        fs::create_dir_all(&components)?;
        fs::write(components.join("button.tsx"), "export {};")?;
        let importer = temp.path().join("src").join("app.tsx");
        fs::write(&importer, "")?;

        let resolved = resolve_import("@/components/button", &importer, temp.path());
        assert!(resolved.is_some_and(|p| p.ends_with("components/button.tsx")));
        Ok(())
    }

    #[test]
    fn test_bare_specifier_unresolved() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let importer = temp.path().join("src").join("app.js");

        assert_eq!(resolve_import("react", &importer, temp.path()), None);
        Ok(())
    }

    #[test]
    fn test_resolve_rust_crate_path() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let utils = temp.path().join("src").join("utils");
        fs::create_dir_all(&utils)?;
        fs::write(utils.join("foo.rs"), "pub fn foo() {}")?;
        let importer = temp.path().join("src").join("lib.rs");
        fs::write(&importer, "use crate::utils::foo;")?;

        let resolved = resolve_import("crate::utils::foo", &importer, temp.path());
        assert!(resolved.is_some_and(|p| p.ends_with("utils/foo.rs")));
        Ok(())
    }

    #[test]
    fn test_resolve_python_module() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("utils.py"), "def helper(): pass")?;
        let importer = temp.path().join("main.py");
        fs::write(&importer, "import utils")?;

        let resolved = resolve_import("utils", &importer, temp.path());
        assert!(resolved.is_some_and(|p| p.ends_with("utils.py")));
        Ok(())
    }
}
