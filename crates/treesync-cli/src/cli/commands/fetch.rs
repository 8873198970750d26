//! `treesync fetch [--no-staging]` – download tree data only.

use anyhow::{Context, Result};
use std::path::Path;
use treesync_core::config::TreesyncConfig;

use super::progress::ProgressPrinter;

pub async fn run_fetch(cfg: &TreesyncConfig, data_dir: &Path, use_staging: bool) -> Result<()> {
    let stager = super::stager(cfg, data_dir, use_staging);
    let target = stager.paths().staging_root.clone();
    tokio::task::spawn_blocking(move || {
        let printer = ProgressPrinter::default();
        stager.fetch_all_with_progress(&|phase, fraction| printer.report(phase, fraction))
    })
    .await
    .context("fetch task join")?
    .with_context(|| format!("fetch into {}", target.display()))?;
    println!("Tree data downloaded to {}", target.display());
    if use_staging {
        println!("Run `treesync commit` to make it live.");
    }
    Ok(())
}
