//! Manifest reading and field validation
//!
//! [`validate_fields`] walks the fields of one [`RawManifest`] in a fixed order and stops at the
//! first disqualifying condition:
//!
//! 1. `name` present
//! 2. `keira_version` present (apps)
//! 3. `description`, `@file` resolved; absence or an unreadable file degrade to `""`
//! 4. `short_description` present; an unreadable `@file` rejects the item
//! 5. `changelog`, resolved like `description`
//! 6. `author` present
//! 7. `icon` absence is advisory
//! 8. `sources.type` and `sources.location.origin` present
//! 9. `executionfile` advisory (apps), `modfiles` required (mods)
//!
//! The remote checks that follow live in [`crate::reachability`].

mod raw;

pub use raw::{RawAsset, RawLocation, RawManifest, RawOrigin, RawSources};

use crate::error::ManifestError;
use crate::item::{AssetRef, CatalogItem, ItemCommon, ItemVariant, SourceRef};
use crate::types::{ItemKind, Warning, WarningCategory};
use std::path::{Path, PathBuf};

/// Prefix marking a field whose value names a file to read instead
pub const INDIRECTION_PREFIX: char = '@';

/// Manifest file names looked up in each item folder, in order
pub const MANIFEST_FILES: [&str; 2] = ["manifest.yml", "manifest.yaml"];

/// Result of field validation for one manifest
#[derive(Debug)]
pub enum Validation {
    /// Every required field is present
    Accepted {
        /// The typed item
        item: CatalogItem,
        /// Non-fatal findings, in the order they were raised
        advisories: Vec<Warning>,
    },
    /// The first disqualifying condition
    Rejected(Warning),
}

impl Validation {
    /// Whether the manifest was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted { .. })
    }
}

/// Locate the manifest file inside an item folder
pub fn find_manifest(item_dir: &Path) -> Option<PathBuf> {
    MANIFEST_FILES
        .iter()
        .map(|name| item_dir.join(name))
        .find(|path| path.is_file())
}

/// Read and parse the manifest of an item folder
pub async fn load_manifest(path: &Path) -> Result<RawManifest, ManifestError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ManifestError::FileRead {
            field: "manifest",
            path: path.to_path_buf(),
            source,
        })?;
    let content = std::str::from_utf8(&bytes).map_err(|e| ManifestError::Parse {
        path: path.to_path_buf(),
        source: <serde_yaml::Error as serde::de::Error>::custom(format!(
            "manifest is not valid UTF-8: {e}"
        )),
    })?;
    RawManifest::parse(content, path)
}

/// Resolve an `@file` value relative to the item folder; other values are returned unchanged
pub async fn resolve_indirection(
    field: &'static str,
    value: &str,
    item_dir: &Path,
) -> Result<String, ManifestError> {
    let Some(file) = value.strip_prefix(INDIRECTION_PREFIX) else {
        return Ok(value.to_string());
    };
    let path = item_dir.join(file.trim());
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ManifestError::FileRead {
            field,
            path,
            source,
        })
}

/// Collects advisories for one item and builds the rejection warning
struct FieldCheck<'a> {
    slug: &'a str,
    kind: ItemKind,
    advisories: Vec<Warning>,
}

impl FieldCheck<'_> {
    fn warning(&self, category: WarningCategory, message: String) -> Warning {
        Warning::new(self.slug, self.kind, category, message)
    }

    fn advise(&mut self, error: &ManifestError) {
        let warning = self.warning(error.category(), error.to_string());
        self.advisories.push(warning);
    }

    fn reject(&self, error: ManifestError) -> Validation {
        Validation::Rejected(self.warning(error.category(), error.to_string()))
    }

    fn require<T>(&self, value: Option<T>, field: &'static str) -> Result<T, Validation> {
        value.ok_or_else(|| self.reject(ManifestError::MissingField { field }))
    }

    /// Optional indirection field: absence and read failures degrade to an empty string
    async fn lenient_text(
        &mut self,
        field: &'static str,
        value: Option<String>,
        item_dir: &Path,
    ) -> String {
        let Some(value) = value else {
            return String::new();
        };
        match resolve_indirection(field, &value, item_dir).await {
            Ok(text) => text,
            Err(e) => {
                self.advise(&e);
                String::new()
            }
        }
    }
}

/// Validate the fields of one manifest
///
/// Returns [`Validation::Rejected`] with exactly one warning for the first failing required
/// check. Advisories raised before a rejection are dropped with it.
pub async fn validate_fields(
    raw: RawManifest,
    kind: ItemKind,
    slug: &str,
    item_dir: &Path,
) -> Validation {
    let mut check = FieldCheck {
        slug,
        kind,
        advisories: Vec::new(),
    };
    match run_checks(&mut check, raw, kind, slug, item_dir).await {
        Ok(item) => Validation::Accepted {
            item,
            advisories: check.advisories,
        },
        Err(rejected) => rejected,
    }
}

async fn run_checks(
    check: &mut FieldCheck<'_>,
    raw: RawManifest,
    kind: ItemKind,
    slug: &str,
    item_dir: &Path,
) -> Result<CatalogItem, Validation> {
    let name = check.require(raw.name, "name")?;

    let keira_version = match kind {
        ItemKind::App => Some(check.require(raw.keira_version, "keira_version")?),
        ItemKind::Mod => None,
    };

    let description = check
        .lenient_text("description", raw.description, item_dir)
        .await;

    let short_description = check.require(raw.short_description, "short_description")?;
    let short_description = resolve_indirection("short_description", &short_description, item_dir)
        .await
        .map_err(|e| check.reject(e))?;

    let changelog = check
        .lenient_text("changelog", raw.changelog, item_dir)
        .await;

    let author = check.require(raw.author, "author")?;

    if raw.icon.is_none() {
        check.advise(&ManifestError::MissingField { field: "icon" });
    }

    let sources = check.require(raw.sources, "sources")?;
    let source_type = check.require(sources.type_name, "sources.type")?;
    let location = check.require(sources.location, "sources.location")?;
    let origin = check.require(location.origin, "sources.location.origin")?;

    let variant = match kind {
        ItemKind::App => {
            let executionfile = match raw.executionfile {
                Some(RawAsset {
                    type_name,
                    location: Some(location),
                }) => Some(AssetRef {
                    type_name,
                    location: location.into_string(),
                }),
                Some(RawAsset { location: None, .. }) => {
                    check.advise(&ManifestError::MissingField {
                        field: "executionfile.location",
                    });
                    None
                }
                None => {
                    check.advise(&ManifestError::MissingField {
                        field: "executionfile",
                    });
                    None
                }
            };
            ItemVariant::App {
                keira_version: keira_version.unwrap_or_default(),
                executionfile,
            }
        }
        ItemKind::Mod => {
            let raw_modfiles = check.require(raw.modfiles, "modfiles")?;
            if raw_modfiles.is_empty() {
                return Err(check.reject(ManifestError::MissingField { field: "modfiles" }));
            }
            let mut modfiles = Vec::with_capacity(raw_modfiles.len());
            for entry in raw_modfiles {
                let location = check.require(entry.location, "modfiles.location")?;
                modfiles.push(AssetRef {
                    type_name: entry.type_name,
                    location: location.into_string(),
                });
            }
            ItemVariant::Mod { modfiles }
        }
    };

    Ok(CatalogItem {
        common: ItemCommon {
            slug: slug.to_string(),
            name,
            description,
            short_description,
            changelog,
            author,
            icon: raw.icon,
            screenshots: raw.screenshots.unwrap_or_default(),
            sources: SourceRef::new(source_type, origin),
        },
        variant,
    })
}
