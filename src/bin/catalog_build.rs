//! `catalog-build`: build the Keira app and mod catalog from a source tree
//!
//! Exits non-zero only when the build cannot start or its output cannot be written. Items that
//! fail validation are listed in `warnings.json` and do not affect the exit status.

use clap::Parser;
use keira_catalog::{BuildSummary, CatalogBuilder, Config, FetchMode, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "catalog-build", about = "Build the Keira app and mod catalog", version)]
struct Cli {
    /// Root of the source tree containing apps/ and mods/
    #[arg(long, short = 's')]
    source: Option<PathBuf>,

    /// Build output directory
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Check manifests and assets without writing any asset files
    #[arg(long)]
    validate_only: bool,

    /// Number of slugs per catalog page
    #[arg(long)]
    page_size: Option<usize>,

    /// Reachability probe timeout in seconds
    #[arg(long)]
    probe_timeout: Option<u64>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(source) = &self.source {
            config.paths.source_dir = source.clone();
        }
        if let Some(output) = &self.output {
            config.paths.build_dir = output.clone();
        }
        if self.validate_only {
            config.catalog.mode = FetchMode::Validate;
        }
        if let Some(page_size) = self.page_size {
            config.catalog.page_size = page_size;
        }
        if let Some(seconds) = self.probe_timeout {
            config.network.probe_timeout = Duration::from_secs(seconds);
        }
        config.validate()?;
        Ok(config)
    }
}

fn initialize_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn log_summary(summary: &BuildSummary) {
    tracing::info!(
        apps = summary.apps.emitted.len(),
        apps_skipped = summary.apps.skipped.len(),
        app_pages = summary.apps.pages,
        mods = summary.mods.emitted.len(),
        mods_skipped = summary.mods.skipped.len(),
        mod_pages = summary.mods.pages,
        warnings = summary.total_warnings,
        report = %summary.warnings_path.display(),
        "Catalog build finished"
    );
}

async fn build(cli: &Cli) -> Result<BuildSummary> {
    let config = cli.load_config()?;
    CatalogBuilder::new(config)?.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_tracing(cli.verbose);

    match build(&cli).await {
        Ok(summary) => {
            log_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Catalog build failed");
            ExitCode::FAILURE
        }
    }
}
