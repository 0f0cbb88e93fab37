//! Per-item pipeline: manifest, field validation, reachability, materialization, documents.

use crate::error::Result;
use crate::index::write_item_documents;
use crate::manifest::{Validation, find_manifest, load_manifest, validate_fields};
use crate::reachability::check_reachability;
use crate::types::{ItemKind, WarningCategory};
use crate::warnings::WarningCollector;

use super::CatalogBuilder;
use super::materialize::Materialization;

/// What happened to one candidate item
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Documents were written and the slug is listed in the catalog pages
    Emitted,
    /// The item produced no output; the reason is in the warnings report
    Skipped,
}

impl CatalogBuilder {
    /// Run one item through every stage
    ///
    /// A rejected item contributes exactly one warning; advisories raised before the rejection
    /// are discarded with it. Only failures to write into the build directory are returned as
    /// errors.
    pub(crate) async fn process_item(
        &self,
        kind: ItemKind,
        slug: &str,
        warnings: &WarningCollector,
    ) -> Result<ItemOutcome> {
        let item_dir = self.config.source_dir().join(kind.dir_name()).join(slug);

        let Some(manifest_path) = find_manifest(&item_dir) else {
            warnings.record(
                slug,
                kind,
                WarningCategory::MissingManifest,
                format!("no manifest.yml in {}", item_dir.display()),
            );
            return Ok(ItemOutcome::Skipped);
        };

        let raw = match load_manifest(&manifest_path).await {
            Ok(raw) => raw,
            Err(e) => {
                warnings.record(slug, kind, e.category(), e.to_string());
                return Ok(ItemOutcome::Skipped);
            }
        };

        let (item, mut advisories) = match validate_fields(raw, kind, slug, &item_dir).await {
            Validation::Accepted { item, advisories } => (item, advisories),
            Validation::Rejected(warning) => {
                warnings.push(warning);
                return Ok(ItemOutcome::Skipped);
            }
        };

        let reachability = check_reachability(&item, &item_dir, &self.client).await;
        if let Some(fatal) = reachability.fatal {
            warnings.push(fatal);
            return Ok(ItemOutcome::Skipped);
        }
        advisories.extend(reachability.advisories);

        let out_dir = self.config.build_dir().join(kind.dir_name()).join(slug);
        tokio::fs::create_dir_all(&out_dir).await?;

        let materialized = match self
            .materialize(item, &item_dir, &out_dir, &reachability.unavailable)
            .await?
        {
            Materialization::Ready {
                item,
                advisories: dropped,
            } => {
                advisories.extend(dropped);
                item
            }
            Materialization::Rejected(warning) => {
                tokio::fs::remove_dir_all(&out_dir).await?;
                warnings.push(warning);
                return Ok(ItemOutcome::Skipped);
            }
        };
        warnings.extend(advisories);
        write_item_documents(&materialized, &out_dir).await?;

        tracing::info!(kind = %kind, slug = %slug, "Emitted item");
        Ok(ItemOutcome::Emitted)
    }
}
