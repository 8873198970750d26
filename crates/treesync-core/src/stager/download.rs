//! Fetch one file into the assets directory unless it is already there.

use crate::error::Result;
use crate::fetch::{FetchMode, Fetcher};
use crate::storage::PartFileWriter;

use super::tree::DownloadItem;

/// Downloads `item` if its target file does not exist. Returns whether a
/// download happened. Published tree assets never change under the same
/// name, so an existing file is trusted as-is.
pub(crate) fn download_if_missing<F: Fetcher + ?Sized>(
    fetcher: &F,
    item: &DownloadItem,
) -> Result<bool> {
    if item.path.exists() {
        tracing::debug!(path = %item.path.display(), "already present, skipping");
        return Ok(false);
    }
    let response = fetcher
        .fetch(&item.url, FetchMode::Full)?
        .error_for_status(&item.url)?;
    let mut writer = PartFileWriter::create(&item.path)?;
    writer.write_all(&response.body)?;
    writer.finalize()?;
    tracing::debug!(
        url = %item.url,
        path = %item.path.display(),
        bytes = response.body.len(),
        "downloaded"
    );
    Ok(true)
}

/// Runs `download_if_missing` over `items` in order, reporting the
/// cumulative fraction after each one. Stops at the first error.
pub(crate) fn download_all<F: Fetcher + ?Sized>(
    fetcher: &F,
    items: &[DownloadItem],
    mut on_progress: Option<&mut dyn FnMut(f64)>,
) -> Result<usize> {
    let mut progress = super::progress::ItemProgress::new(items.len());
    let mut fetched = 0usize;
    for item in items {
        if download_if_missing(fetcher, item)? {
            fetched += 1;
        }
        let fraction = progress.advance();
        if let Some(cb) = on_progress.as_mut() {
            cb(fraction);
        }
    }
    Ok(fetched)
}
