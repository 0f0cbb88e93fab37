//! Typed catalog items
//!
//! A manifest moves through three values on its way to the catalog:
//! [`RawManifest`](crate::manifest::RawManifest) (parsed, everything optional),
//! [`CatalogItem`] (validated, required fields guaranteed) and [`MaterializedItem`]
//! (asset locations rewritten to local file names). Each stage builds a new value
//! instead of patching the previous one.

use crate::types::{FetchMechanism, ItemKind};
use serde::{Deserialize, Serialize};

/// Reference to a downloadable or copyable file (`{type, location}`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Fetch mechanism name as written in the manifest
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub type_name: Option<String>,
    /// URL or path relative to the item folder; a bare file name once materialized
    pub location: String,
}

impl AssetRef {
    /// Mechanism selected by the `type` field (plain fetch when absent)
    pub fn mechanism(&self) -> FetchMechanism {
        self.type_name
            .as_deref()
            .map(FetchMechanism::from_type)
            .unwrap_or(FetchMechanism::PlainFetch)
    }

    /// Same reference pointing at a new location
    pub fn relocated(&self, location: impl Into<String>) -> Self {
        Self {
            type_name: self.type_name.clone(),
            location: location.into(),
        }
    }
}

/// The item's source repository (`{type, location: {origin}}`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Fetch mechanism name as written in the manifest
    #[serde(rename = "type")]
    pub type_name: String,
    /// Where the sources live
    pub location: SourceLocation,
}

/// Location block of a [`SourceRef`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Repository URL
    pub origin: String,
}

impl SourceRef {
    /// Create a source reference
    pub fn new(type_name: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            location: SourceLocation {
                origin: origin.into(),
            },
        }
    }

    /// Mechanism selected by the `type` field
    pub fn mechanism(&self) -> FetchMechanism {
        FetchMechanism::from_type(&self.type_name)
    }

    /// Repository URL
    pub fn origin(&self) -> &str {
        &self.location.origin
    }
}

/// Fields shared by apps and mods
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemCommon {
    /// Folder slug, unique per kind
    pub slug: String,
    /// Display name
    pub name: String,
    /// Long description (indirection resolved, empty when absent)
    pub description: String,
    /// One-line description (indirection resolved)
    pub short_description: String,
    /// Changelog (indirection resolved, empty when absent)
    pub changelog: String,
    /// Author
    pub author: String,
    /// Icon path or URL
    pub icon: Option<String>,
    /// Screenshot paths or URLs, in display order
    pub screenshots: Vec<String>,
    /// Source repository
    pub sources: SourceRef,
}

/// Kind-specific fields
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemVariant {
    /// Application
    App {
        /// Firmware version the app targets
        keira_version: String,
        /// Binary to run on the device
        executionfile: Option<AssetRef>,
    },
    /// Mod
    Mod {
        /// Files making up the mod, in manifest order
        modfiles: Vec<AssetRef>,
    },
}

/// A manifest that passed field validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogItem {
    /// Shared fields
    pub common: ItemCommon,
    /// Kind-specific fields
    pub variant: ItemVariant,
}

impl CatalogItem {
    /// Kind of this item
    pub fn kind(&self) -> ItemKind {
        match self.variant {
            ItemVariant::App { .. } => ItemKind::App,
            ItemVariant::Mod { .. } => ItemKind::Mod,
        }
    }

    /// Folder slug
    pub fn slug(&self) -> &str {
        &self.common.slug
    }

    /// Execution file, for apps that declare one
    pub fn executionfile(&self) -> Option<&AssetRef> {
        match &self.variant {
            ItemVariant::App { executionfile, .. } => executionfile.as_ref(),
            ItemVariant::Mod { .. } => None,
        }
    }

    /// Mod files (empty for apps)
    pub fn modfiles(&self) -> &[AssetRef] {
        match &self.variant {
            ItemVariant::App { .. } => &[],
            ItemVariant::Mod { modfiles } => modfiles,
        }
    }
}

/// An item whose assets now live in its `static/` folder
///
/// `item` is a rebuilt [`CatalogItem`] whose locations are bare file names; assets that
/// could not be materialized have been dropped from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterializedItem {
    /// Item with local asset names
    pub item: CatalogItem,
    /// File name of the RGB565 icon blob, when transcoding succeeded
    pub icon_min: Option<String>,
}

impl MaterializedItem {
    /// Kind of this item
    pub fn kind(&self) -> ItemKind {
        self.item.kind()
    }

    /// Folder slug
    pub fn slug(&self) -> &str {
        self.item.slug()
    }
}
