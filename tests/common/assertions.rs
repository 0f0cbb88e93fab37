//! Custom assertions over the build output tree

use keira_catalog::warnings::WARNINGS_FILE;
use keira_catalog::{Warning, WarningReport};
use serde_json::Value;
use std::path::Path;
use walkdir::WalkDir;

/// Parse a JSON document from the build tree
pub fn read_json(build: &Path, relative: &str) -> Value {
    let path = build.join(relative);
    let bytes = std::fs::read(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("parse {}: {e}", path.display()))
}

/// Parse `warnings.json`
pub fn read_report(build: &Path) -> WarningReport {
    let bytes = std::fs::read(build.join(WARNINGS_FILE)).expect("warnings.json written");
    serde_json::from_slice(&bytes).expect("warnings.json is a valid report")
}

/// Warnings recorded for one slug
pub fn warnings_for<'a>(report: &'a WarningReport, slug: &str) -> Vec<&'a Warning> {
    report
        .warnings
        .iter()
        .filter(|w| w.item_slug == slug)
        .collect()
}

/// Every file under `dir`, as sorted paths relative to it
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(dir)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    files.sort();
    files
}

/// Assert that no output mentions `slug`
pub fn assert_not_emitted(build: &Path, kind_dir: &str, slug: &str) {
    assert!(
        !build.join(kind_dir).join(slug).exists(),
        "{slug} should have no output folder"
    );
    for file in list_files(&build.join(kind_dir)) {
        if file.starts_with("index_") {
            let page = read_json(&build.join(kind_dir), &file);
            let listed = page["manifests"]
                .as_array()
                .map(|m| m.iter().any(|s| s == slug))
                .unwrap_or(false);
            assert!(!listed, "{slug} listed in {file}");
        }
    }
}
