//! `treesync backup|restore|delete-backup|commit|discard` – one swap step each.

use anyhow::{Context, Result};
use std::path::Path;
use treesync_core::config::TreesyncConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Backup,
    Restore,
    DeleteBackup,
    Commit,
    Discard,
}

impl Transition {
    fn label(self) -> &'static str {
        match self {
            Transition::Backup => "backup",
            Transition::Restore => "restore",
            Transition::DeleteBackup => "delete backup",
            Transition::Commit => "commit",
            Transition::Discard => "discard staging",
        }
    }
}

pub async fn run_transition(cfg: &TreesyncConfig, data_dir: &Path, step: Transition) -> Result<()> {
    let stager = super::stager(cfg, data_dir, true);
    let state = tokio::task::spawn_blocking(move || {
        let done = match step {
            Transition::Backup => stager.backup(),
            Transition::Restore => stager.restore_backup(),
            Transition::DeleteBackup => stager.delete_backup(),
            Transition::Commit => stager.commit_staging(),
            Transition::Discard => stager.delete_staging(),
        };
        done.map(|()| stager.state())
    })
    .await
    .context("swap task join")?
    .with_context(|| format!("{} in {}", step.label(), data_dir.display()))?;
    println!("{}: done, data directory is now {}", step.label(), state);
    Ok(())
}
