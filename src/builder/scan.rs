//! Source tree enumeration and build directory preparation.

use crate::error::{Error, Result};
use crate::types::ItemKind;
use crate::warnings::WARNINGS_FILE;
use std::path::Path;

use super::CatalogBuilder;

/// List candidate item folders of one kind, sorted by slug
///
/// Hidden directories and plain files are ignored. A missing kind directory yields an empty
/// list.
pub(crate) async fn list_item_slugs(kind_dir: &Path) -> Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(kind_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(dir = %kind_dir.display(), "Kind directory absent, nothing to build");
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let mut slugs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let Some(slug) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!(path = %entry.path().display(), "Skipping folder with non UTF-8 name");
            continue;
        };
        if slug.starts_with('.') {
            continue;
        }
        slugs.push(slug);
    }
    slugs.sort();
    Ok(slugs)
}

impl CatalogBuilder {
    /// Remove the output of the previous run and recreate the kind directories
    pub(crate) async fn prepare_build_dir(&self) -> Result<()> {
        let build_dir = self.config.build_dir();
        tokio::fs::create_dir_all(build_dir).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create build directory '{}': {}",
                    build_dir.display(),
                    e
                ),
            ))
        })?;

        for kind in ItemKind::ALL {
            let kind_dir = build_dir.join(kind.dir_name());
            if tokio::fs::try_exists(&kind_dir).await? {
                tracing::debug!(dir = %kind_dir.display(), "Removing previous output");
                tokio::fs::remove_dir_all(&kind_dir).await?;
            }
            tokio::fs::create_dir_all(&kind_dir).await?;
        }

        let report = build_dir.join(WARNINGS_FILE);
        if tokio::fs::try_exists(&report).await? {
            tokio::fs::remove_file(&report).await?;
        }
        Ok(())
    }
}
