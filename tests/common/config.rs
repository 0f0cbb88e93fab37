//! Test configuration helpers for building against temporary trees and mock servers

use keira_catalog::{CatalogBuilder, Config, FetchMode};
use std::path::Path;
use std::time::Duration;

/// Configuration reading `<root>/src` and writing `<root>/build`
///
/// `127.0.0.1` is registered as a forge so `git` sources served by a local mock server are
/// probed like hosted repositories. Retries are fast so failing fetches do not stall tests.
pub fn test_config(root: &Path, mode: FetchMode) -> Config {
    let mut config = Config::default();
    config.paths.source_dir = root.join("src");
    config.paths.build_dir = root.join("build");
    config.catalog.mode = mode;
    config.network.probe_timeout = Duration::from_millis(500);
    config.network.known_forges = vec!["127.0.0.1".to_string()];
    config.network.retry.max_attempts = 1;
    config.network.retry.initial_delay = Duration::from_millis(10);
    config.network.retry.max_delay = Duration::from_millis(20);
    config.network.retry.jitter = false;
    config
}

/// Create a builder for [`test_config`]
pub fn test_builder(root: &Path, mode: FetchMode) -> CatalogBuilder {
    CatalogBuilder::new(test_config(root, mode)).expect("test configuration is valid")
}
