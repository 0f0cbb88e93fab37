//! Catalog documents
//!
//! Per item, `index.json` carries the full descriptor and `index_short.json` (apps only) the
//! fields the device list view needs. Per kind, the ordered slug list is split into
//! `index_<page>.json` documents. Optional fields are omitted, never written as `null`.

use crate::error::Result;
use crate::item::{AssetRef, ItemVariant, MaterializedItem, SourceRef};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Full descriptor file name
pub const INDEX_FILE: &str = "index.json";

/// Short descriptor file name (apps only)
pub const SHORT_INDEX_FILE: &str = "index_short.json";

/// File name of one catalog page
///
/// ```
/// assert_eq!(keira_catalog::index::page_file_name(0), "index_0.json");
/// ```
#[must_use]
pub fn page_file_name(page: usize) -> String {
    format!("index_{page}.json")
}

/// Contents of `index.json`
#[derive(Debug, Serialize)]
pub struct IndexDocument<'a> {
    /// Display name
    pub name: &'a str,
    /// Long description, possibly empty
    pub description: &'a str,
    /// One-line description
    pub short_description: &'a str,
    /// Changelog, omitted when empty
    #[serde(skip_serializing_if = "str::is_empty")]
    pub changelog: &'a str,
    /// Author
    pub author: &'a str,
    /// Icon file name in `static/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'a str>,
    /// RGB565 icon file name in `static/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_min: Option<&'a str>,
    /// Source repository
    pub sources: &'a SourceRef,
    /// Screenshot file names, in display order
    pub screenshots: &'a [String],
    /// Execution file (apps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executionfile: Option<&'a AssetRef>,
    /// Mod files (mods)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modfiles: Option<&'a [AssetRef]>,
}

impl<'a> IndexDocument<'a> {
    /// Build the full descriptor of a materialized item
    pub fn from_item(materialized: &'a MaterializedItem) -> Self {
        let common = &materialized.item.common;
        let (executionfile, modfiles) = match &materialized.item.variant {
            ItemVariant::App { executionfile, .. } => (executionfile.as_ref(), None),
            ItemVariant::Mod { modfiles } => (None, Some(modfiles.as_slice())),
        };
        Self {
            name: &common.name,
            description: &common.description,
            short_description: &common.short_description,
            changelog: &common.changelog,
            author: &common.author,
            icon: common.icon.as_deref(),
            icon_min: materialized.icon_min.as_deref(),
            sources: &common.sources,
            screenshots: &common.screenshots,
            executionfile,
            modfiles,
        }
    }
}

/// Contents of `index_short.json`
#[derive(Debug, Serialize)]
pub struct ShortIndexDocument<'a> {
    /// Display name
    pub name: &'a str,
    /// One-line description
    pub short_description: &'a str,
    /// Execution file, when the app has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executionfile: Option<&'a AssetRef>,
}

impl<'a> ShortIndexDocument<'a> {
    /// Build the short descriptor; mods have none
    pub fn from_item(materialized: &'a MaterializedItem) -> Option<Self> {
        match &materialized.item.variant {
            ItemVariant::App { executionfile, .. } => Some(Self {
                name: &materialized.item.common.name,
                short_description: &materialized.item.common.short_description,
                executionfile: executionfile.as_ref(),
            }),
            ItemVariant::Mod { .. } => None,
        }
    }
}

/// Contents of one `index_<page>.json`
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PageDocument<'a> {
    /// 0-based page number
    pub page: usize,
    /// Number of pages for this kind
    pub total_pages: usize,
    /// Slugs on this page, in catalog order
    pub manifests: &'a [String],
}

/// Split an ordered slug list into pages of `page_size`
///
/// Produces `ceil(len / page_size)` pages; only the last one may be partial and an empty list
/// yields no pages. `page_size` must be non-zero.
pub fn paginate(slugs: &[String], page_size: usize) -> Vec<PageDocument<'_>> {
    let total_pages = slugs.len().div_ceil(page_size);
    slugs
        .chunks(page_size)
        .enumerate()
        .map(|(page, manifests)| PageDocument {
            page,
            total_pages,
            manifests,
        })
        .collect()
}

/// Write `index.json` and, for apps, `index_short.json` into `item_dir`
pub async fn write_item_documents(item: &MaterializedItem, item_dir: &Path) -> Result<()> {
    let full = serde_json::to_vec_pretty(&IndexDocument::from_item(item))?;
    tokio::fs::write(item_dir.join(INDEX_FILE), full).await?;

    if let Some(short) = ShortIndexDocument::from_item(item) {
        let short = serde_json::to_vec_pretty(&short)?;
        tokio::fs::write(item_dir.join(SHORT_INDEX_FILE), short).await?;
    }

    debug!(slug = %item.slug(), kind = %item.kind(), "Wrote item documents");
    Ok(())
}

/// Write every catalog page for one kind into `kind_dir`, returning the page count
pub async fn write_pages(slugs: &[String], kind_dir: &Path, page_size: usize) -> Result<usize> {
    let pages = paginate(slugs, page_size);
    for page in &pages {
        let json = serde_json::to_vec_pretty(page)?;
        tokio::fs::write(kind_dir.join(page_file_name(page.page)), json).await?;
    }
    Ok(pages.len())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{CatalogItem, ItemCommon};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn slugs(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item-{i:03}")).collect()
    }

    fn common() -> ItemCommon {
        ItemCommon {
            slug: "snake".into(),
            name: "Snake".into(),
            description: "Eat apples".into(),
            short_description: "Classic".into(),
            changelog: String::new(),
            author: "Lilka".into(),
            icon: None,
            screenshots: vec![],
            sources: SourceRef::new("git", "https://github.com/lilka-dev/snake"),
        }
    }

    fn app(executionfile: Option<AssetRef>, icon_min: Option<&str>) -> MaterializedItem {
        MaterializedItem {
            item: CatalogItem {
                common: common(),
                variant: ItemVariant::App {
                    keira_version: "0.3".into(),
                    executionfile,
                },
            },
            icon_min: icon_min.map(String::from),
        }
    }

    #[test]
    fn page_counts_follow_ceiling_division() {
        for (n, expected) in [(0, 0), (1, 1), (12, 1), (13, 2), (24, 2), (25, 3)] {
            let list = slugs(n);
            let pages = paginate(&list, 12);
            assert_eq!(pages.len(), expected, "n = {n}");
            assert!(pages.iter().all(|p| p.total_pages == expected));
            assert!(pages.iter().enumerate().all(|(i, p)| p.page == i));
        }
    }

    #[test]
    fn pages_concatenate_to_the_original_list() {
        let list = slugs(25);
        let pages = paginate(&list, 12);
        assert_eq!(pages[2].manifests.len(), 1);
        let joined: Vec<String> = pages
            .iter()
            .flat_map(|p| p.manifests.iter().cloned())
            .collect();
        assert_eq!(joined, list);
    }

    #[test]
    fn full_document_omits_absent_optionals() {
        let item = app(None, None);
        let value = serde_json::to_value(IndexDocument::from_item(&item)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Snake",
                "description": "Eat apples",
                "short_description": "Classic",
                "author": "Lilka",
                "sources": {"type": "git", "location": {"origin": "https://github.com/lilka-dev/snake"}},
                "screenshots": []
            })
        );
    }

    #[test]
    fn full_document_keeps_field_order_and_optionals() {
        let mut item = app(
            Some(AssetRef {
                type_name: Some("wget".into()),
                location: "snake.bin".into(),
            }),
            Some("icon_min.bin"),
        );
        item.item.common.icon = Some("icon.png".into());
        item.item.common.changelog = "Fixed tail".into();
        item.item.common.screenshots = vec!["one.png".into()];

        let text = serde_json::to_string(&IndexDocument::from_item(&item)).unwrap();
        let keys = [
            "\"name\"",
            "\"description\"",
            "\"short_description\"",
            "\"changelog\"",
            "\"author\"",
            "\"icon\"",
            "\"icon_min\"",
            "\"sources\"",
            "\"screenshots\"",
            "\"executionfile\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| text.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
        assert!(!text.contains("modfiles"));
        assert!(!text.contains("keira_version"));
    }

    #[test]
    fn mod_document_lists_modfiles_and_has_no_short_form() {
        let item = MaterializedItem {
            item: CatalogItem {
                common: common(),
                variant: ItemVariant::Mod {
                    modfiles: vec![AssetRef {
                        type_name: None,
                        location: "theme.lua".into(),
                    }],
                },
            },
            icon_min: None,
        };
        let value = serde_json::to_value(IndexDocument::from_item(&item)).unwrap();
        assert_eq!(value["modfiles"], json!([{"location": "theme.lua"}]));
        assert!(value.get("executionfile").is_none());
        assert!(ShortIndexDocument::from_item(&item).is_none());
    }

    #[tokio::test]
    async fn writes_item_and_page_documents() {
        let dir = TempDir::new().unwrap();
        let item = app(None, None);
        write_item_documents(&item, dir.path()).await.unwrap();

        let short: Value =
            serde_json::from_slice(&std::fs::read(dir.path().join(SHORT_INDEX_FILE)).unwrap())
                .unwrap();
        assert_eq!(
            short,
            json!({"name": "Snake", "short_description": "Classic"})
        );

        let list = slugs(13);
        let written = write_pages(&list, dir.path(), 12).await.unwrap();
        assert_eq!(written, 2);
        let last: Value =
            serde_json::from_slice(&std::fs::read(dir.path().join("index_1.json")).unwrap())
                .unwrap();
        assert_eq!(
            last,
            json!({"page": 1, "total_pages": 2, "manifests": ["item-012"]})
        );
        assert!(!dir.path().join("index_2.json").exists());
    }
}
