//! Asset fetching, image normalization and icon transcoding.

use crate::assets::AssetFetcher;
use crate::config::{Bounds, FetchMode};
use crate::error::{ImageError, Result};
use crate::imaging::{normalize_image, write_icon_min};
use crate::item::{CatalogItem, ItemVariant, MaterializedItem};
use crate::types::{ItemKind, Warning, WarningCategory};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::CatalogBuilder;

/// Name of the asset folder inside each item's output folder
pub(crate) const STATIC_DIR: &str = "static";

/// What materializing one item produced
#[derive(Debug)]
pub(crate) enum Materialization {
    /// The item can be emitted; `advisories` describes the assets left out of it
    Ready {
        item: MaterializedItem,
        advisories: Vec<Warning>,
    },
    /// None of a mod's files could be materialized; the item is not emitted
    Rejected(Warning),
}

/// Per-item context shared by the asset steps
struct AssetContext<'a> {
    fetcher: AssetFetcher<'a>,
    slug: &'a str,
    kind: ItemKind,
    item_dir: &'a Path,
    static_dir: PathBuf,
    unavailable: &'a HashSet<String>,
    advisories: Mutex<Vec<Warning>>,
}

impl AssetContext<'_> {
    fn advise(&self, category: WarningCategory, message: String) {
        self.push(Warning::new(self.slug, self.kind, category, message));
    }

    fn push(&self, warning: Warning) {
        self.advisories
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(warning);
    }

    fn into_advisories(self) -> Vec<Warning> {
        self.advisories
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch or copy one asset; `None` when reachability already reported it
    async fn try_fetch(
        &self,
        field: &str,
        location: &str,
    ) -> Option<std::result::Result<String, Warning>> {
        if self.unavailable.contains(location) {
            return None;
        }
        let outcome = self
            .fetcher
            .materialize(location, self.item_dir, &self.static_dir)
            .await
            .map_err(|e| {
                Warning::new(
                    self.slug,
                    self.kind,
                    e.category(),
                    format!("{field} '{location}': {e}"),
                )
            });
        Some(outcome)
    }

    /// Fetch or copy one asset; failures are recorded and yield `None`
    async fn fetch(&self, field: &str, location: &str) -> Option<String> {
        match self.try_fetch(field, location).await? {
            Ok(name) => Some(name),
            Err(warning) => {
                self.push(warning);
                None
            }
        }
    }

    fn writes_files(&self) -> bool {
        self.fetcher.mode() == FetchMode::Materialize
    }
}

/// Run a blocking image operation off the async workers
async fn run_blocking<T, F>(operation: F) -> std::result::Result<T, ImageError>
where
    F: FnOnce() -> std::result::Result<T, ImageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|e| ImageError::Task(e.to_string()))?
}

impl CatalogBuilder {
    /// Bring every asset of `item` into `<out_dir>/static/` and rewrite its locations
    ///
    /// Assets listed in `unavailable` were already reported by the reachability pass and are
    /// dropped without a second warning. A mod whose every file fails is rejected with a
    /// single warning.
    pub(crate) async fn materialize(
        &self,
        item: CatalogItem,
        item_dir: &Path,
        out_dir: &Path,
        unavailable: &HashSet<String>,
    ) -> Result<Materialization> {
        let mode = self.config.catalog.mode;
        let ctx = AssetContext {
            fetcher: AssetFetcher::new(&self.client, mode),
            slug: item.slug(),
            kind: item.kind(),
            item_dir,
            static_dir: out_dir.join(STATIC_DIR),
            unavailable,
            advisories: Mutex::new(Vec::new()),
        };
        if ctx.writes_files() {
            tokio::fs::create_dir_all(&ctx.static_dir).await?;
        }

        let mut icon = None;
        let mut icon_min = None;
        if let Some(location) = &item.common.icon
            && let Some(name) = ctx.fetch("icon", location).await
        {
            if ctx.writes_files() {
                let path = ctx.static_dir.join(&name);
                self.normalize(&ctx, path.clone(), self.config.images.icon_bounds)
                    .await;
                icon_min = self.transcode_icon(&ctx, path).await;
            }
            icon = Some(name);
        }

        let mut screenshots = Vec::with_capacity(item.common.screenshots.len());
        for location in &item.common.screenshots {
            if let Some(name) = ctx.fetch("screenshot", location).await {
                if ctx.writes_files() {
                    let path = ctx.static_dir.join(&name);
                    self.normalize(&ctx, path, self.config.images.screenshot_bounds)
                        .await;
                }
                screenshots.push(name);
            }
        }

        let variant = match &item.variant {
            ItemVariant::App {
                keira_version,
                executionfile,
            } => {
                let mut local = None;
                if let Some(exec) = executionfile
                    && let Some(name) = ctx.fetch("executionfile", &exec.location).await
                {
                    local = Some(exec.relocated(name));
                }
                ItemVariant::App {
                    keira_version: keira_version.clone(),
                    executionfile: local,
                }
            }
            ItemVariant::Mod { modfiles } => {
                let mut local = Vec::with_capacity(modfiles.len());
                let mut failures = Vec::new();
                for modfile in modfiles {
                    match ctx.try_fetch("modfile", &modfile.location).await {
                        Some(Ok(name)) => local.push(modfile.relocated(name)),
                        Some(Err(warning)) => failures.push(warning),
                        None => {}
                    }
                }
                if local.is_empty() {
                    return Ok(Materialization::Rejected(no_modfiles(&ctx, failures)));
                }
                failures.into_iter().for_each(|warning| ctx.push(warning));
                ItemVariant::Mod { modfiles: local }
            }
        };

        let mut common = item.common.clone();
        common.icon = icon;
        common.screenshots = screenshots;
        Ok(Materialization::Ready {
            item: MaterializedItem {
                item: CatalogItem { common, variant },
                icon_min,
            },
            advisories: ctx.into_advisories(),
        })
    }

    /// Normalize one image in place; failures leave the file as it is
    async fn normalize(&self, ctx: &AssetContext<'_>, path: PathBuf, bounds: Bounds) {
        let images = &self.config.images;
        let (quality, max_bytes) = (images.jpeg_quality, images.max_file_bytes);
        let target = path.clone();
        match run_blocking(move || normalize_image(&target, bounds, quality, max_bytes)).await {
            Ok(outcome) => {
                tracing::debug!(slug = %ctx.slug, path = %path.display(), ?outcome, "Image checked");
            }
            Err(e) => ctx.advise(WarningCategory::ImageProcessingError, e.to_string()),
        }
    }

    /// Write the RGB565 icon next to the icon; failures leave the item without one
    async fn transcode_icon(&self, ctx: &AssetContext<'_>, icon_path: PathBuf) -> Option<String> {
        let static_dir = ctx.static_dir.clone();
        match run_blocking(move || write_icon_min(&icon_path, &static_dir)).await {
            Ok(name) => Some(name),
            Err(e) => {
                ctx.advise(WarningCategory::IconTranscodeError, e.to_string());
                None
            }
        }
    }
}

/// The one warning a mod without any usable file is skipped with
fn no_modfiles(ctx: &AssetContext<'_>, failures: Vec<Warning>) -> Warning {
    let count = failures.len();
    match failures.into_iter().next() {
        Some(first) => Warning::new(
            ctx.slug,
            ctx.kind,
            first.category,
            format!(
                "none of the {count} mod file(s) could be materialized; first failure: {}",
                first.message
            ),
        ),
        None => Warning::new(
            ctx.slug,
            ctx.kind,
            WarningCategory::MissingField,
            "no usable entry left in 'modfiles'",
        ),
    }
}
