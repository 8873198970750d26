//! `treesync update` – fetch into staging and swap it in.

use anyhow::{Context, Result};
use std::path::Path;
use treesync_core::config::TreesyncConfig;
use treesync_core::update;

use super::progress::ProgressPrinter;

pub async fn run_update(cfg: &TreesyncConfig, data_dir: &Path) -> Result<()> {
    let stager = super::stager(cfg, data_dir, true);
    tokio::task::spawn_blocking(move || {
        let printer = ProgressPrinter::default();
        update::run_update(&stager, &|phase, fraction| printer.report(phase, fraction))
    })
    .await
    .context("update task join")?
    .with_context(|| format!("update {}", data_dir.display()))?;
    println!("Tree data updated in {}", data_dir.display());
    Ok(())
}
