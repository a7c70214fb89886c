use std::fs;
use std::path::Path;

use depmap::{DepmapConfig, run};
use tempfile::TempDir;

fn write_project(root: &Path) -> anyhow::Result<()> {
    let src = root.join("src");
    fs::create_dir_all(&src)?;
    // Sizes descend index > a > b so the ranking is unambiguous.
    fs::write(
        src.join("index.js"),
        "import './a';\nimport 'react';\nconsole.log('application entry point, longest file');\n",
    )?;
    fs::write(src.join("a.js"), "import './b';\nexport const a = 1;\n")?;
    fs::write(src.join("b.js"), "export const b = 1;\n")?;
    Ok(())
}

#[test]
fn test_end_to_end_project_scan() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    write_project(root)?;

    let output = root.join("dependency-map.json");
    let config = DepmapConfig {
        path: root.to_path_buf(),
        output: output.clone(),
        project_only: true,
        max_depth: 3,
        verbose: true,
        ..Default::default()
    };
    run(config)?;

    assert!(output.exists());
    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;

    assert_eq!(report["summary"]["totalModules"], 3);
    assert_eq!(report["summary"]["entryPointCount"], 1);
    assert_eq!(report["summary"]["circularDependencies"], serde_json::json!([]));

    // One module per depth level: b is the leaf, index the entry.
    let by_depth = report["modulesByDepth"].as_object().unwrap();
    assert_eq!(by_depth.len(), 3);
    for depth in ["0", "1", "2"] {
        assert_eq!(by_depth[depth].as_array().unwrap().len(), 1, "depth {}", depth);
    }
    assert!(by_depth["0"][0].as_str().unwrap().ends_with("b.js"));
    assert!(by_depth["2"][0].as_str().unwrap().ends_with("index.js"));

    // Descending by size.
    let largest: Vec<&str> = report["largestModules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(largest.len(), 3);
    assert!(largest[0].ends_with("index.js"));
    assert!(largest[2].ends_with("b.js"));

    // Project-only mode drops the unresolved react specifier entirely.
    assert!(!report["dependencyTree"].as_object().unwrap().contains_key("react"));
    Ok(())
}

#[test]
fn test_external_ids_kept_by_default() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    write_project(root)?;

    let output = root.join("map.json");
    let config = DepmapConfig {
        path: root.to_path_buf(),
        output: output.clone(),
        ..Default::default()
    };
    run(config)?;

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;

    // The bare specifier has a graph node but no module record.
    let tree = report["dependencyTree"].as_object().unwrap();
    assert!(tree.contains_key("react"));
    assert!(!report["modules"].as_object().unwrap().contains_key("react"));

    let entry_key = tree
        .keys()
        .find(|k| k.ends_with("index.js"))
        .expect("entry module in tree");
    let children = tree[entry_key]["children"].as_array().unwrap();
    assert!(children.iter().any(|c| c.as_str() == Some("react")));
    Ok(())
}

#[test]
fn test_circular_imports_reported() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let src = root.join("src");
    fs::create_dir_all(&src)?;
    fs::write(src.join("x.js"), "import './y';\n")?;
    fs::write(src.join("y.js"), "import './x';\n")?;

    let output = root.join("map.json");
    let config = DepmapConfig {
        path: root.to_path_buf(),
        output: output.clone(),
        ..Default::default()
    };
    run(config)?;

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    let cycles = report["summary"]["circularDependencies"].as_array().unwrap();
    // One record per node the cycle is entered from.
    assert_eq!(cycles.len(), 2);
    for cycle in cycles {
        assert!(cycle.as_str().unwrap().contains(" -> "));
    }
    Ok(())
}

#[test]
fn test_dedup_cycles_toggle() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let src = root.join("src");
    fs::create_dir_all(&src)?;
    fs::write(src.join("x.js"), "import './y';\n")?;
    fs::write(src.join("y.js"), "import './x';\n")?;

    let output = root.join("map.json");
    let config = DepmapConfig {
        path: root.to_path_buf(),
        output: output.clone(),
        dedup_cycles: true,
        ..Default::default()
    };
    run(config)?;

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    let cycles = report["summary"]["circularDependencies"].as_array().unwrap();
    assert_eq!(cycles.len(), 1);
    Ok(())
}

#[test]
fn test_ignore_patterns_exclude_files() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    write_project(root)?;
    fs::write(root.join("src").join("generated.min.js"), "var x=1;\n")?;

    let output = root.join("map.json");
    let config = DepmapConfig {
        path: root.to_path_buf(),
        output: output.clone(),
        ..Default::default()
    };
    run(config)?;

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert!(
        !report["modules"]
            .as_object()
            .unwrap()
            .keys()
            .any(|k| k.ends_with("generated.min.js"))
    );
    Ok(())
}
