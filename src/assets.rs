//! Asset materialization
//!
//! An [`AssetFetcher`] turns a location descriptor (URL or path relative to the item folder)
//! into a file in the item's `static/` directory and returns the bare file name the catalog
//! documents should reference. In [`FetchMode::Validate`] it only checks that the asset exists.

use crate::config::FetchMode;
use crate::error::AssetError;
use crate::remote::RemoteClient;
use crate::utils::{is_remote, item_local_path, location_basename};
use std::path::Path;
use tracing::debug;

/// Resolves asset locations into the build tree
#[derive(Clone, Debug)]
pub struct AssetFetcher<'a> {
    client: &'a RemoteClient,
    mode: FetchMode,
}

impl<'a> AssetFetcher<'a> {
    /// Create a fetcher using the given client and mode
    pub fn new(client: &'a RemoteClient, mode: FetchMode) -> Self {
        Self { client, mode }
    }

    /// Mode this fetcher runs in
    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    /// Materialize one asset and return its local file name
    ///
    /// Remote assets are probed first; a "not found" answer fails with
    /// [`AssetError::NotFound`] before any download starts, while other probe failures fall
    /// through to the fetch. Relative assets are copied from `item_dir`.
    ///
    /// # Errors
    /// - [`AssetError::Missing`] when a relative asset does not exist or points outside
    ///   `item_dir`
    /// - [`AssetError::NotFound`] / [`AssetError::HttpStatus`] / [`AssetError::Unreachable`]
    ///   when a remote asset cannot be retrieved
    /// - [`AssetError::Write`] when the file cannot be stored in `static_dir`
    pub async fn materialize(
        &self,
        location: &str,
        item_dir: &Path,
        static_dir: &Path,
    ) -> Result<String, AssetError> {
        let filename = location_basename(location);

        if is_remote(location) {
            let url = location.trim();
            match self.client.probe(url).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => return Err(e),
                Err(e) if self.mode == FetchMode::Validate => return Err(e),
                Err(e) => debug!(url = %url, error = %e, "Probe failed, fetching anyway"),
            }
            if self.mode == FetchMode::Validate {
                return Ok(filename);
            }

            let bytes = self.client.fetch(url).await?;
            let dest = static_dir.join(&filename);
            tokio::fs::write(&dest, bytes)
                .await
                .map_err(|source| AssetError::Write { path: dest, source })?;
            debug!(url = %url, file = %filename, "Fetched asset");
            return Ok(filename);
        }

        let Some(source) = item_local_path(item_dir, location) else {
            return Err(AssetError::Missing {
                path: location.into(),
            });
        };
        if !tokio::fs::metadata(&source)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
        {
            return Err(AssetError::Missing { path: source });
        }
        if self.mode == FetchMode::Validate {
            return Ok(filename);
        }

        let dest = static_dir.join(&filename);
        tokio::fs::copy(&source, &dest)
            .await
            .map_err(|e| AssetError::Write {
                path: dest.clone(),
                source: e,
            })?;
        debug!(source = %source.display(), file = %filename, "Copied asset");
        Ok(filename)
    }
}
