//! # keira-catalog
//!
//! Builds the app and mod catalog served to Keira devices from a tree of item folders.
//!
//! ## Pipeline
//!
//! Every folder under `apps/` and `mods/` holds one `manifest.yml`. For each folder, in sorted
//! order, the builder:
//! - validates the manifest fields ([`manifest`])
//! - probes the source repository and execution file ([`reachability`])
//! - copies or downloads icons, screenshots and binaries into `static/` ([`assets`])
//! - caps image sizes and writes the 64x64 RGB565 icon ([`imaging`])
//! - writes `index.json` / `index_short.json` and the paginated catalog ([`index`])
//!
//! Anything that goes wrong for a single item is recorded in `warnings.json` ([`warnings`])
//! and the build carries on.
//!
//! ## Quick Start
//!
//! ```no_run
//! use keira_catalog::{CatalogBuilder, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.paths.source_dir = "./catalog".into();
//!     config.paths.build_dir = "./build".into();
//!
//!     let summary = CatalogBuilder::new(config)?.run().await?;
//!     println!(
//!         "{} apps, {} mods, {} warnings",
//!         summary.apps.emitted.len(),
//!         summary.mods.emitted.len(),
//!         summary.total_warnings
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Asset materialization into the build tree
pub mod assets;
/// Build orchestration (decomposed into focused submodules)
pub mod builder;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Image normalization and RGB565 transcoding
pub mod imaging;
/// Catalog document serialization
pub mod index;
/// Typed catalog items
pub mod item;
/// Manifest parsing and field validation
pub mod manifest;
/// Reachability checks for source repositories and execution files
pub mod reachability;
/// HTTP probing and fetching
pub mod remote;
/// Retry logic with exponential backoff
pub mod retry;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;
/// Warning collection and report
pub mod warnings;

// Re-export commonly used types
pub use builder::{CatalogBuilder, ItemOutcome};
pub use config::{Config, FetchMode};
pub use error::{AssetError, Error, ImageError, ManifestError, Result};
pub use item::{CatalogItem, MaterializedItem};
pub use types::{BuildSummary, ItemKind, KindSummary, Warning, WarningCategory};
pub use warnings::{WarningCollector, WarningReport};
