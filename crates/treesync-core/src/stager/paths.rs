//! Fixed layout of a data directory.

use std::path::{Path, PathBuf};

pub const TREE_FILE: &str = "SkillTree.json";
pub const OPTS_FILE: &str = "Opts.json";
pub const ASSETS_DIR: &str = "Assets";
pub const STAGING_DIR: &str = "Temp";
pub const BACKUP_DIR: &str = "Backup";

/// Live, staging and backup locations under one base directory.
///
/// With staging disabled the staging paths equal the live paths, so
/// downloads land directly in the live data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingPaths {
    pub base: PathBuf,
    pub tree_file: PathBuf,
    pub opts_file: PathBuf,
    pub assets_dir: PathBuf,
    pub staging_root: PathBuf,
    pub staging_tree_file: PathBuf,
    pub staging_opts_file: PathBuf,
    pub staging_assets_dir: PathBuf,
    pub backup_dir: PathBuf,
    use_staging: bool,
}

impl StagingPaths {
    pub fn new(base: &Path, use_staging: bool) -> Self {
        let staging_root = if use_staging {
            base.join(STAGING_DIR)
        } else {
            base.to_path_buf()
        };
        Self {
            base: base.to_path_buf(),
            tree_file: base.join(TREE_FILE),
            opts_file: base.join(OPTS_FILE),
            assets_dir: base.join(ASSETS_DIR),
            staging_tree_file: staging_root.join(TREE_FILE),
            staging_opts_file: staging_root.join(OPTS_FILE),
            staging_assets_dir: staging_root.join(ASSETS_DIR),
            staging_root,
            backup_dir: base.join(BACKUP_DIR),
            use_staging,
        }
    }

    pub fn uses_staging(&self) -> bool {
        self.use_staging
    }

    pub fn backup_tree_file(&self) -> PathBuf {
        self.backup_dir.join(TREE_FILE)
    }

    pub fn backup_opts_file(&self) -> PathBuf {
        self.backup_dir.join(OPTS_FILE)
    }

    pub fn backup_assets_dir(&self) -> PathBuf {
        self.backup_dir.join(ASSETS_DIR)
    }
}
