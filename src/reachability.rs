//! Remote reachability checks for validated items
//!
//! Only a missing source repository disqualifies an item. Everything else (local icons and
//! screenshots absent on disk, an execution file the server can't find, probes that time out)
//! is reported as advisory and the item carries on.

use crate::error::AssetError;
use crate::item::CatalogItem;
use crate::remote::RemoteClient;
use crate::types::{FetchMechanism, Warning, WarningCategory};
use crate::utils::{is_remote, item_local_path};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Findings of the reachability pass for one item
#[derive(Debug, Default)]
pub struct ReachabilityReport {
    /// Non-fatal findings, in the order they were raised
    pub advisories: Vec<Warning>,
    /// Set when the item must be excluded from the catalog
    pub fatal: Option<Warning>,
    /// Asset locations already reported as unavailable; materialization skips them
    pub unavailable: HashSet<String>,
}

impl ReachabilityReport {
    /// Whether the item survives the check
    pub fn is_reachable(&self) -> bool {
        self.fatal.is_none()
    }
}

fn is_local_file(item_dir: &Path, location: &str) -> bool {
    item_local_path(item_dir, location).is_some_and(|path| path.is_file())
}

/// Probe the external references of an item without downloading anything
pub async fn check_reachability(
    item: &CatalogItem,
    item_dir: &Path,
    client: &RemoteClient,
) -> ReachabilityReport {
    let mut report = ReachabilityReport::default();
    let advise = |category: WarningCategory, message: String| {
        Warning::new(item.slug(), item.kind(), category, message)
    };

    if let Some(icon) = &item.common.icon
        && !is_remote(icon)
        && !is_local_file(item_dir, icon)
    {
        report.advisories.push(advise(
            WarningCategory::MissingIcon,
            format!("icon '{icon}' not found in item folder"),
        ));
        report.unavailable.insert(icon.clone());
    }

    for screenshot in &item.common.screenshots {
        if !is_remote(screenshot) && !is_local_file(item_dir, screenshot) {
            report.advisories.push(advise(
                WarningCategory::MissingScreenshot,
                format!("screenshot '{screenshot}' not found in item folder"),
            ));
            report.unavailable.insert(screenshot.clone());
        }
    }

    let sources = &item.common.sources;
    let is_forge_repo = sources.mechanism() == FetchMechanism::VersionedRepo
        && client.is_known_forge(sources.origin());
    if is_forge_repo {
        match client.probe(sources.origin()).await {
            Ok(()) => debug!(
                slug = %item.slug(),
                origin = %sources.origin(),
                "Source repository reachable"
            ),
            Err(e) if e.is_not_found() => {
                report.fatal = Some(advise(
                    WarningCategory::RepoNotFound,
                    format!("source repository {} not found", sources.origin()),
                ));
                return report;
            }
            Err(e) => report.advisories.push(advise(
                WarningCategory::RepoUnreachable,
                format!("could not verify source repository: {e}"),
            )),
        }
    } else {
        debug!(
            slug = %item.slug(),
            origin = %sources.origin(),
            "Source repository not on a known forge, skipping probe"
        );
    }

    if let Some(exec) = item.executionfile() {
        let outcome = if is_remote(&exec.location) {
            client.probe(&exec.location).await
        } else if is_local_file(item_dir, &exec.location) {
            Ok(())
        } else {
            Err(AssetError::Missing {
                path: item_dir.join(&exec.location),
            })
        };
        match outcome {
            Ok(()) => {}
            Err(e @ (AssetError::NotFound { .. } | AssetError::Missing { .. })) => {
                report.advisories.push(advise(
                    WarningCategory::ExecFileNotFound,
                    format!("execution file {e}"),
                ));
                report.unavailable.insert(exec.location.clone());
            }
            Err(e) => report.advisories.push(advise(
                WarningCategory::ExecFileUnreachable,
                format!("could not verify execution file: {e}"),
            )),
        }
    }

    report
}
