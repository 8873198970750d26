//! CLI command handlers, one file per command.

mod fetch;
mod normalize;
mod progress;
mod status;
mod transition;
mod update;

pub use fetch::run_fetch;
pub use normalize::run_normalize;
pub use status::run_status;
pub use transition::{run_transition, Transition};
pub use update::run_update;

use std::path::Path;
use treesync_core::config::TreesyncConfig;
use treesync_core::fetch::CurlFetcher;
use treesync_core::stager::AssetStager;

fn stager(cfg: &TreesyncConfig, data_dir: &Path, use_staging: bool) -> AssetStager<CurlFetcher> {
    AssetStager::from_config(CurlFetcher::new(&cfg.http), cfg, data_dir).with_staging(use_staging)
}
