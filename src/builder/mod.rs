//! Build orchestration split into focused submodules.
//!
//! The `CatalogBuilder` struct and its methods are organized by stage:
//! - [`scan`] - Source tree enumeration and build directory preparation
//! - [`process`] - Per-item pipeline from manifest to emitted documents
//! - [`materialize`] - Asset fetching, image normalization and icon transcoding

mod materialize;
mod process;
mod scan;


use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::write_pages;
use crate::remote::RemoteClient;
use crate::types::{BuildSummary, ItemKind};
use crate::warnings::{WARNINGS_FILE, WarningCollector};
use std::sync::Arc;

pub use process::ItemOutcome;

/// Builds the catalog from a source tree (cloneable, config is Arc-wrapped)
#[derive(Clone, Debug)]
pub struct CatalogBuilder {
    /// Configuration shared by every stage
    pub(crate) config: Arc<Config>,
    /// HTTP client for probes and fetches
    pub(crate) client: RemoteClient,
}

impl CatalogBuilder {
    /// Create a builder from a validated configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be created
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = RemoteClient::new(&config.network)?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Get the configuration this builder runs with
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Run one complete build
    ///
    /// Apps are processed first, then mods, each in sorted slug order and one item at a time.
    /// Per-item problems end up in `warnings.json`; only setup failures (missing source tree,
    /// unwritable build directory) are returned as errors.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use keira_catalog::{CatalogBuilder, Config};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let summary = CatalogBuilder::new(Config::default())?.run().await?;
    ///     println!("{} apps, {} warnings", summary.apps.emitted.len(), summary.total_warnings);
    ///     Ok(())
    /// }
    /// ```
    pub async fn run(&self) -> Result<BuildSummary> {
        let source_dir = self.config.source_dir();
        let is_dir = tokio::fs::metadata(source_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(Error::SourceTreeMissing(source_dir.clone()));
        }

        self.prepare_build_dir().await?;
        let build_dir = self.config.build_dir();
        let warnings = WarningCollector::new();
        let mut summary = BuildSummary::default();

        tracing::info!(
            source = %source_dir.display(),
            build = %build_dir.display(),
            mode = ?self.config.catalog.mode,
            "Starting catalog build"
        );

        for kind in ItemKind::ALL {
            let slugs = scan::list_item_slugs(&source_dir.join(kind.dir_name())).await?;
            tracing::info!(kind = %kind, candidates = slugs.len(), "Processing items");

            for slug in slugs {
                let outcome = self.process_item(kind, &slug, &warnings).await?;
                let kind_summary = summary.kind_mut(kind);
                match outcome {
                    ItemOutcome::Emitted => kind_summary.emitted.push(slug),
                    ItemOutcome::Skipped => kind_summary.skipped.push(slug),
                }
            }

            let kind_summary = summary.kind_mut(kind);
            kind_summary.pages = write_pages(
                &kind_summary.emitted,
                &build_dir.join(kind.dir_name()),
                self.config.catalog.page_size,
            )
            .await?;
            tracing::info!(
                kind = %kind,
                emitted = kind_summary.emitted.len(),
                skipped = kind_summary.skipped.len(),
                pages = kind_summary.pages,
                "Finished kind"
            );
        }

        let report = warnings.flush(build_dir).await?;
        summary.total_warnings = report.total_warnings;
        summary.warnings_path = build_dir.join(WARNINGS_FILE);
        Ok(summary)
    }
}
