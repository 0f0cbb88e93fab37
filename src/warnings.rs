//! Warning aggregation and the `warnings.json` report
//!
//! A [`WarningCollector`] is created once per build and handed to every stage. It only ever
//! grows: entries are never removed, reordered or deduplicated. At the end of the run the
//! collected entries are flushed once as a [`WarningReport`].

use crate::error::Result;
use crate::types::{ItemKind, Warning, WarningCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// File name of the report inside the build directory
pub const WARNINGS_FILE: &str = "warnings.json";

/// Append-only, shareable sink for build warnings
#[derive(Clone, Debug, Default)]
pub struct WarningCollector {
    entries: Arc<Mutex<Vec<Warning>>>,
}

impl WarningCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Warning>> {
        // A poisoned lock still holds a valid list; appends never leave it half-written
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a warning
    pub fn push(&self, warning: Warning) {
        tracing::warn!(
            slug = %warning.item_slug,
            kind = ?warning.item_kind,
            category = %warning.category,
            "{}",
            warning.message
        );
        self.lock().push(warning);
    }

    /// Append a warning attributed to an item
    pub fn record(
        &self,
        slug: &str,
        kind: ItemKind,
        category: WarningCategory,
        message: impl Into<String>,
    ) {
        self.push(Warning::new(slug, kind, category, message));
    }

    /// Append several warnings, preserving their order
    pub fn extend(&self, warnings: impl IntoIterator<Item = Warning>) {
        for warning in warnings {
            self.push(warning);
        }
    }

    /// Number of warnings recorded so far
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no warning has been recorded
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of all warnings in insertion order
    pub fn snapshot(&self) -> Vec<Warning> {
        self.lock().clone()
    }

    /// Warnings recorded for one slug, in insertion order
    pub fn for_slug(&self, slug: &str) -> Vec<Warning> {
        self.lock()
            .iter()
            .filter(|w| w.item_slug == slug)
            .cloned()
            .collect()
    }

    /// Build the report, stamped with the current time
    pub fn report(&self) -> WarningReport {
        WarningReport::new(Utc::now(), self.snapshot())
    }

    /// Write `warnings.json` into `build_dir` and return the report that was written
    pub async fn flush(&self, build_dir: &Path) -> Result<WarningReport> {
        let report = self.report();
        let path = build_dir.join(WARNINGS_FILE);
        let json = serde_json::to_vec_pretty(&report)?;
        tokio::fs::write(&path, json).await?;
        tracing::info!(
            path = %path.display(),
            total_warnings = report.total_warnings,
            "Wrote warnings report"
        );
        Ok(report)
    }
}

/// Contents of `warnings.json`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WarningReport {
    /// Time the report was flushed
    pub build_date: DateTime<Utc>,
    /// Number of entries in `warnings`
    pub total_warnings: usize,
    /// Every warning of the run, in the order it was recorded
    pub warnings: Vec<Warning>,
}

impl WarningReport {
    /// Create a report from an ordered list of warnings
    pub fn new(build_date: DateTime<Utc>, warnings: Vec<Warning>) -> Self {
        Self {
            build_date,
            total_warnings: warnings.len(),
            warnings,
        }
    }
}
