//! Core types for keira-catalog

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of catalog item
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Standalone application for the device
    App,
    /// Modification shipped as one or more mod files
    Mod,
}

impl ItemKind {
    /// All kinds, in the order the build processes them
    pub const ALL: [ItemKind; 2] = [ItemKind::App, ItemKind::Mod];

    /// Singular name used in warnings ("app", "mod")
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::App => "app",
            ItemKind::Mod => "mod",
        }
    }

    /// Directory name used in both the source and build trees ("apps", "mods")
    pub fn dir_name(&self) -> &'static str {
        match self {
            ItemKind::App => "apps",
            ItemKind::Mod => "mods",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an asset or source repository is retrieved
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchMechanism {
    /// Versioned repository (manifest `type: git`)
    VersionedRepo,
    /// Plain download or copy (manifest `type: wget`, `http`, `file`, ...)
    PlainFetch,
}

impl FetchMechanism {
    /// Map a manifest `type` value to a mechanism
    ///
    /// Only `git` selects the versioned-repo mechanism; every other value is a plain fetch.
    pub fn from_type(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("git") {
            FetchMechanism::VersionedRepo
        } else {
            FetchMechanism::PlainFetch
        }
    }
}

/// Category of a recorded warning
///
/// Serialized as the snake_case `type` field of each `warnings.json` entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCategory {
    /// A field is absent (required fields reject the item, `icon` is advisory)
    MissingField,
    /// An `@file` indirection could not be read
    FileReadError,
    /// A relative-path icon is absent on disk
    MissingIcon,
    /// A relative-path screenshot is absent on disk
    MissingScreenshot,
    /// The source repository reported "not found" (item rejected)
    RepoNotFound,
    /// The source repository probe failed for another reason (advisory)
    RepoUnreachable,
    /// The execution file reported "not found" (advisory)
    ExecFileNotFound,
    /// The execution file probe failed for another reason (advisory)
    ExecFileUnreachable,
    /// An item folder contains no manifest file
    MissingManifest,
    /// The manifest file is not valid YAML of the expected shape
    ManifestParseError,
    /// A relative-path asset could not be found while materializing
    AssetMissing,
    /// A remote asset could not be fetched or written
    AssetFetchError,
    /// Image normalization failed; the asset was left as-is
    ImageProcessingError,
    /// RGB565 icon transcoding failed; the item has no `icon_min`
    IconTranscodeError,
}

impl WarningCategory {
    /// snake_case name as written to `warnings.json`
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCategory::MissingField => "missing_field",
            WarningCategory::FileReadError => "file_read_error",
            WarningCategory::MissingIcon => "missing_icon",
            WarningCategory::MissingScreenshot => "missing_screenshot",
            WarningCategory::RepoNotFound => "repo_not_found",
            WarningCategory::RepoUnreachable => "repo_unreachable",
            WarningCategory::ExecFileNotFound => "exec_file_not_found",
            WarningCategory::ExecFileUnreachable => "exec_file_unreachable",
            WarningCategory::MissingManifest => "missing_manifest",
            WarningCategory::ManifestParseError => "manifest_parse_error",
            WarningCategory::AssetMissing => "asset_missing",
            WarningCategory::AssetFetchError => "asset_fetch_error",
            WarningCategory::ImageProcessingError => "image_processing_error",
            WarningCategory::IconTranscodeError => "icon_transcode_error",
        }
    }
}

impl std::fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the warnings report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Slug of the item the warning is about
    #[serde(rename = "name")]
    pub item_slug: String,
    /// Warning category
    #[serde(rename = "type")]
    pub category: WarningCategory,
    /// Human-readable description
    pub message: String,
    /// Kind of the item, when known
    #[serde(rename = "item_type", skip_serializing_if = "Option::is_none", default)]
    pub item_kind: Option<ItemKind>,
}

impl Warning {
    /// Create a warning attributed to an item of a known kind
    pub fn new(
        item_slug: impl Into<String>,
        kind: ItemKind,
        category: WarningCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            item_slug: item_slug.into(),
            category,
            message: message.into(),
            item_kind: Some(kind),
        }
    }
}

/// Per-kind outcome of a build
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct KindSummary {
    /// Slugs written to the catalog, in sorted order
    pub emitted: Vec<String>,
    /// Slugs that were rejected and produced no output
    pub skipped: Vec<String>,
    /// Number of paginated index documents written
    pub pages: usize,
}

/// Outcome of a complete build run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    /// Apps outcome
    pub apps: KindSummary,
    /// Mods outcome
    pub mods: KindSummary,
    /// Number of warnings written to the report
    pub total_warnings: usize,
    /// Path of the written warnings report
    pub warnings_path: PathBuf,
}

impl BuildSummary {
    /// Mutable summary for the given kind
    pub fn kind_mut(&mut self, kind: ItemKind) -> &mut KindSummary {
        match kind {
            ItemKind::App => &mut self.apps,
            ItemKind::Mod => &mut self.mods,
        }
    }

    /// Summary for the given kind
    pub fn kind(&self, kind: ItemKind) -> &KindSummary {
        match kind {
            ItemKind::App => &self.apps,
            ItemKind::Mod => &self.mods,
        }
    }
}
