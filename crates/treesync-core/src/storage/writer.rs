//! Writer for a single downloaded file, staged under a `.part` name.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::temp_path;
use crate::error::{IoContext, Result};

/// Sequential writer for `<final>.part`. Nothing appears at the final path
/// until `finalize`; dropping the writer unfinalized removes the temp file.
pub struct PartFileWriter {
    file: Option<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
    finalized: bool,
}

impl PartFileWriter {
    /// Create (or truncate) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .at_path(&temp_path)?;
        Ok(PartFileWriter {
            file: Some(file),
            temp_path,
            final_path: final_path.to_path_buf(),
            finalized: false,
        })
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        if let Some(f) = self.file.as_mut() {
            f.write_all(data).at_path(&self.temp_path)?;
        }
        Ok(())
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Sync and rename the temp file onto the final path, replacing any file
    /// already there.
    pub fn finalize(mut self) -> Result<()> {
        if let Some(f) = self.file.take() {
            f.sync_all().at_path(&self.temp_path)?;
        }
        std::fs::rename(&self.temp_path, &self.final_path).at_path(&self.final_path)?;
        self.finalized = true;
        Ok(())
    }
}

impl Drop for PartFileWriter {
    fn drop(&mut self) {
        drop(self.file.take());
        if !self.finalized {
            match std::fs::remove_file(&self.temp_path) {
                Ok(()) => tracing::debug!(
                    path = %self.temp_path.display(),
                    "removed unfinished temp file"
                ),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    path = %self.temp_path.display(),
                    "could not remove temp file: {}",
                    e
                ),
            }
        }
    }
}
