//! Asset staging for the tree data directory.
//!
//! Downloads the tree document, node sprite sheets and asset images into a
//! staging location, then swaps them into the live data directory by moves.
//! The directory is always in one of four states:
//!
//! | state              | live | `Temp/` | `Backup/` |
//! |--------------------|------|---------|-----------|
//! | live-only          | yes  | no      | no        |
//! | staged             | yes  | yes     | no        |
//! | backed-up          | no   | no      | yes       |
//! | staged+backed-up   | no   | yes     | yes       |
//!
//! and each public operation is one transition. None of them is atomic
//! against a crash: a process killed mid-`backup()` can leave the tree file
//! moved and the assets not. Callers recover by running the whole swap again.

mod download;
mod paths;
mod progress;
mod tree;

pub use paths::{StagingPaths, ASSETS_DIR, BACKUP_DIR, OPTS_FILE, STAGING_DIR, TREE_FILE};
pub use progress::{FetchPhase, ItemProgress};
pub use tree::{
    extract_tree_document, DownloadItem, SpriteSheet, TreeModel, SPRITE_CDN_PREFIX,
    TREE_DATA_PREFIX,
};

use std::fmt;
use std::path::Path;
use std::sync::mpsc;

use crate::config::{TreesyncConfig, DEFAULT_SPRITE_URL, DEFAULT_TREE_ADDRESS};
use crate::error::{Error, IoContext, Result};
use crate::fetch::{FetchMode, Fetcher};
use crate::storage::{self, PartFileWriter};

/// Which locations of the data directory currently hold content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDirState {
    pub live: bool,
    pub staged: bool,
    pub backed_up: bool,
}

impl fmt::Display for DataDirState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (self.staged, self.backed_up) {
            (false, false) if !self.live => "empty",
            (false, false) => "live-only",
            (true, false) => "staged",
            (false, true) => "backed-up",
            (true, true) => "staged+backed-up",
        };
        f.write_str(name)
    }
}

/// Downloads tree data into one data directory and manages its swaps.
///
/// Each stager owns its directory; running two against the same directory
/// at once is not supported.
pub struct AssetStager<F> {
    fetcher: F,
    paths: StagingPaths,
    tree_address: String,
    sprite_url: String,
}

impl<F: Fetcher> AssetStager<F> {
    /// Stager for `data_dir`. With `use_staging`, downloads go to `Temp/`
    /// and must be committed; without it they land in the live paths.
    pub fn new(fetcher: F, data_dir: &Path, use_staging: bool) -> Self {
        Self {
            fetcher,
            paths: StagingPaths::new(data_dir, use_staging),
            tree_address: DEFAULT_TREE_ADDRESS.to_string(),
            sprite_url: DEFAULT_SPRITE_URL.to_string(),
        }
    }

    pub fn from_config(fetcher: F, cfg: &TreesyncConfig, data_dir: &Path) -> Self {
        Self::new(fetcher, data_dir, cfg.use_staging)
            .with_tree_address(&cfg.tree_address)
            .with_sprite_url(&cfg.sprite_url)
    }

    /// Switches between staged and direct-to-live downloads.
    pub fn with_staging(mut self, use_staging: bool) -> Self {
        self.paths = StagingPaths::new(&self.paths.base, use_staging);
        self
    }

    pub fn with_tree_address(mut self, address: &str) -> Self {
        self.tree_address = address.to_string();
        self
    }

    pub fn with_sprite_url(mut self, url: &str) -> Self {
        self.sprite_url = url.to_string();
        self
    }

    pub fn paths(&self) -> &StagingPaths {
        &self.paths
    }

    /// Downloads the tree page, extracts the tree document and writes it to
    /// the staging tree file (replacing any previous one). Returns the
    /// document text.
    pub fn fetch_tree_document(&self) -> Result<String> {
        let response = self
            .fetcher
            .fetch(&self.tree_address, FetchMode::Full)?
            .error_for_status(&self.tree_address)?;
        let page = String::from_utf8_lossy(&response.body);
        let document = extract_tree_document(&page)?;

        let target = &self.paths.staging_tree_file;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).at_path(parent)?;
        }
        let mut writer = PartFileWriter::create(target)?;
        writer.write_all(document.as_bytes())?;
        writer.finalize()?;
        tracing::info!(path = %target.display(), bytes = document.len(), "tree document written");
        Ok(document)
    }

    /// Downloads the highest-zoom sprite sheet of every sprite group into
    /// the staging assets directory. Files already present are skipped.
    pub fn fetch_node_sprites(
        &self,
        tree: &TreeModel,
        on_progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<()> {
        let items = tree.sprite_items(&self.sprite_url, &self.paths.staging_assets_dir)?;
        self.download_items(FetchPhase::Sprites, &items, on_progress)
    }

    /// Downloads one image per asset into the staging assets directory as
    /// `<id>.png`. Files already present are skipped.
    pub fn fetch_assets(
        &self,
        tree: &TreeModel,
        on_progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<()> {
        let items = tree.asset_items(&self.paths.staging_assets_dir)?;
        self.download_items(FetchPhase::Assets, &items, on_progress)
    }

    fn download_items(
        &self,
        phase: FetchPhase,
        items: &[DownloadItem],
        on_progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<()> {
        let dir = &self.paths.staging_assets_dir;
        std::fs::create_dir_all(dir).at_path(dir)?;
        let fetched = download::download_all(&self.fetcher, items, on_progress)?;
        tracing::info!(%phase, total = items.len(), fetched, "download task finished");
        Ok(())
    }

    /// Tree document, then sprites and assets side by side.
    pub fn fetch_all(&self) -> Result<()> {
        self.fetch_all_with_progress(&|_, _| {})
    }

    /// Like [`fetch_all`](Self::fetch_all), reporting each task's progress.
    ///
    /// Both download tasks always run to completion or failure. If both
    /// fail, the error that arrived first is returned.
    pub fn fetch_all_with_progress<P>(&self, progress: &P) -> Result<()>
    where
        P: Fn(FetchPhase, f64) + Sync,
    {
        let document = self.fetch_tree_document()?;
        let tree = TreeModel::from_json(&document)?;

        let (tx, rx) = mpsc::channel::<(FetchPhase, Result<()>)>();
        std::thread::scope(|s| {
            for phase in [FetchPhase::Sprites, FetchPhase::Assets] {
                let tx = tx.clone();
                let tree = &tree;
                s.spawn(move || {
                    let mut report = |fraction: f64| progress(phase, fraction);
                    let result = match phase {
                        FetchPhase::Sprites => self.fetch_node_sprites(tree, Some(&mut report)),
                        FetchPhase::Assets => self.fetch_assets(tree, Some(&mut report)),
                    };
                    let _ = tx.send((phase, result));
                });
            }
        });
        drop(tx);

        let mut first_error = None;
        for (phase, result) in rx {
            if let Err(e) = result {
                tracing::warn!(%phase, "download task failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Replaces `Backup/` with the current live tree file, opts file and
    /// assets, moving them. The live locations are empty afterwards.
    pub fn backup(&self) -> Result<()> {
        let p = &self.paths;
        storage::delete_dir_if_exists(&p.backup_dir)?;
        std::fs::create_dir_all(&p.backup_dir).at_path(&p.backup_dir)?;
        storage::move_dir_if_exists(&p.assets_dir, &p.backup_assets_dir())?;
        storage::move_file_if_exists(&p.tree_file, &p.backup_tree_file())?;
        storage::move_file_if_exists(&p.opts_file, &p.backup_opts_file())?;
        tracing::info!(path = %p.backup_dir.display(), "live data moved to backup");
        Ok(())
    }

    /// Moves the backup back over the live locations and removes `Backup/`.
    /// Missing backup entries are skipped.
    pub fn restore_backup(&self) -> Result<()> {
        let p = &self.paths;
        storage::move_dir_if_exists(&p.backup_assets_dir(), &p.assets_dir)?;
        storage::move_file_if_exists(&p.backup_tree_file(), &p.tree_file)?;
        storage::move_file_if_exists(&p.backup_opts_file(), &p.opts_file)?;
        storage::remove_dir_if_empty(&p.backup_dir)?;
        tracing::info!(path = %p.base.display(), "backup restored");
        Ok(())
    }

    pub fn delete_backup(&self) -> Result<()> {
        if storage::delete_dir_if_exists(&self.paths.backup_dir)? {
            tracing::info!(path = %self.paths.backup_dir.display(), "backup deleted");
        }
        Ok(())
    }

    /// Deletes `Temp/` and everything in it.
    pub fn delete_staging(&self) -> Result<()> {
        self.require_staging()?;
        if storage::delete_dir_if_exists(&self.paths.staging_root)? {
            tracing::info!(path = %self.paths.staging_root.display(), "staging deleted");
        }
        Ok(())
    }

    /// Moves the staged tree file, opts file and assets over the live ones
    /// and removes `Temp/`.
    pub fn commit_staging(&self) -> Result<()> {
        self.require_staging()?;
        let p = &self.paths;
        storage::move_dir_if_exists(&p.staging_assets_dir, &p.assets_dir)?;
        storage::move_file_if_exists(&p.staging_tree_file, &p.tree_file)?;
        storage::move_file_if_exists(&p.staging_opts_file, &p.opts_file)?;
        storage::remove_dir_if_empty(&p.staging_root)?;
        tracing::info!(path = %p.base.display(), "staging committed");
        Ok(())
    }

    pub fn state(&self) -> DataDirState {
        let p = &self.paths;
        DataDirState {
            live: p.tree_file.is_file() || p.opts_file.is_file() || p.assets_dir.is_dir(),
            staged: p.uses_staging()
                && (p.staging_tree_file.is_file()
                    || p.staging_opts_file.is_file()
                    || p.staging_assets_dir.is_dir()),
            backed_up: p.backup_dir.is_dir(),
        }
    }

    fn require_staging(&self) -> Result<()> {
        if self.paths.uses_staging() {
            Ok(())
        } else {
            Err(Error::InvalidOperation("this stager doesn't use a staging directory"))
        }
    }
}
