//! `treesync status` – show what the data directory holds.

use anyhow::Result;
use std::path::Path;
use treesync_core::config::TreesyncConfig;

pub fn run_status(cfg: &TreesyncConfig, data_dir: &Path) -> Result<()> {
    let stager = super::stager(cfg, data_dir, true);
    let state = stager.state();
    let paths = stager.paths();
    let mark = |present: bool| if present { "yes" } else { "no" };

    println!("Data directory: {}", data_dir.display());
    println!("State:          {}", state);
    println!("{:<8} {:<4} {}", "WHERE", "HAS", "PATH");
    println!("{:<8} {:<4} {}", "live", mark(state.live), paths.base.display());
    println!("{:<8} {:<4} {}", "staged", mark(state.staged), paths.staging_root.display());
    println!("{:<8} {:<4} {}", "backup", mark(state.backed_up), paths.backup_dir.display());
    Ok(())
}
