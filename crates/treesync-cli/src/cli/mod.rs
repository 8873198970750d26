//! CLI for treesync.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use treesync_core::config;

use commands::{run_fetch, run_normalize, run_status, run_transition, run_update, Transition};

/// Top-level CLI for treesync.
#[derive(Debug, Parser)]
#[command(name = "treesync")]
#[command(
    about = "treesync: build link normalizer and skill tree asset updater",
    long_about = None
)]
pub struct Cli {
    /// Data directory (default: `data_dir` from config, else ~/.local/share/treesync).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a pasted build link into its canonical form.
    Normalize {
        /// Link as pasted (shortened, search-wrapped or without scheme).
        url: String,
    },

    /// Download fresh tree data and swap it in, keeping the old data on failure.
    Update,

    /// Download tree data without swapping it in.
    Fetch {
        /// Write straight into the live files instead of Temp/.
        #[arg(long)]
        no_staging: bool,
    },

    /// Move the live data into Backup/.
    Backup,

    /// Move Backup/ back over the live data.
    Restore,

    /// Delete Backup/.
    DeleteBackup,

    /// Move staged data from Temp/ over the live data.
    Commit,

    /// Delete Temp/.
    Discard,

    /// Show which of live, staged and backed-up data are present.
    Status,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let data_dir = match cli.data_dir {
            Some(dir) => dir,
            None => cfg.resolve_data_dir()?,
        };

        match cli.command {
            CliCommand::Normalize { url } => run_normalize(&cfg, &url).await?,
            CliCommand::Update => run_update(&cfg, &data_dir).await?,
            CliCommand::Fetch { no_staging } => {
                run_fetch(&cfg, &data_dir, cfg.use_staging && !no_staging).await?
            }
            CliCommand::Backup => run_transition(&cfg, &data_dir, Transition::Backup).await?,
            CliCommand::Restore => run_transition(&cfg, &data_dir, Transition::Restore).await?,
            CliCommand::DeleteBackup => {
                run_transition(&cfg, &data_dir, Transition::DeleteBackup).await?
            }
            CliCommand::Commit => run_transition(&cfg, &data_dir, Transition::Commit).await?,
            CliCommand::Discard => run_transition(&cfg, &data_dir, Transition::Discard).await?,
            CliCommand::Status => run_status(&cfg, &data_dir)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
