//! Source tree fixtures and test content generators

use image::{Rgba, RgbaImage};
use keira_catalog::ItemKind;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary workspace with a `src/` tree and a `build/` output directory
pub struct SourceTree {
    root: TempDir,
}

impl SourceTree {
    /// Create an empty source tree
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("src")).expect("create src dir");
        Self { root }
    }

    /// Workspace root (holds `src/` and `build/`)
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Build output directory
    pub fn build(&self) -> PathBuf {
        self.root.path().join("build")
    }

    /// Create an item folder with the given manifest and return its path
    pub fn item(&self, kind: ItemKind, slug: &str, manifest: &str) -> PathBuf {
        let dir = self.root.path().join("src").join(kind.dir_name()).join(slug);
        std::fs::create_dir_all(&dir).expect("create item dir");
        std::fs::write(dir.join("manifest.yml"), manifest).expect("write manifest");
        dir
    }

    /// Write a file inside an item folder, creating parent directories
    pub fn file(&self, item_dir: &Path, relative: &str, contents: &[u8]) {
        let path = item_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, contents).expect("write file");
    }
}

/// Encode a solid-color PNG of the given size
pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    RgbaImage::from_pixel(width, height, Rgba(color))
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// App manifest with every field set
///
/// `origin` is the source repository URL; `icon`, `screenshot` and `exec` are locations as
/// written in the manifest.
pub fn app_manifest(name: &str, origin: &str, icon: &str, screenshot: &str, exec: &str) -> String {
    format!(
        r#"name: {name}
keira_version: "0.3"
description: "@README.md"
short_description: {name} for Keira
changelog: Initial release
author: Lilka Team
icon: {icon}
screenshots:
  - {screenshot}
sources:
  type: git
  location:
    origin: {origin}
executionfile:
  type: wget
  location: {exec}
"#
    )
}

/// Mod manifest with the given mod file locations
pub fn mod_manifest(name: &str, origin: &str, modfiles: &[&str]) -> String {
    let files: String = modfiles
        .iter()
        .map(|location| format!("  - type: wget\n    location: {location}\n"))
        .collect();
    format!(
        r#"name: {name}
short_description: {name} mod
author: Modder
sources:
  type: git
  location:
    origin: {origin}
modfiles:
{files}"#
    )
}
