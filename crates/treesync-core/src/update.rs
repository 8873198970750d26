//! Full refresh of a data directory: fetch into staging, swap, clean up.

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::stager::{AssetStager, FetchPhase};

/// Fetches fresh tree data into staging and swaps it in.
///
/// A failed fetch discards staging and leaves the live data as it was. A
/// failed commit puts the backup back. The backup is only deleted once the
/// new data is live.
pub fn run_update<F, P>(stager: &AssetStager<F>, progress: &P) -> Result<()>
where
    F: Fetcher,
    P: Fn(FetchPhase, f64) + Sync,
{
    if !stager.paths().uses_staging() {
        return Err(Error::InvalidOperation(
            "updating requires a staging directory",
        ));
    }

    tracing::info!(path = %stager.paths().base.display(), "update started");
    if let Err(e) = stager.fetch_all_with_progress(progress) {
        tracing::warn!("fetch failed, discarding staging: {}", e);
        if let Err(cleanup) = stager.delete_staging() {
            tracing::warn!("couldn't discard staging: {}", cleanup);
        }
        return Err(e);
    }

    stager.backup()?;
    if let Err(e) = stager.commit_staging() {
        tracing::warn!("commit failed, restoring backup: {}", e);
        if let Err(restore) = stager.restore_backup() {
            tracing::warn!("couldn't restore backup: {}", restore);
        }
        return Err(e);
    }

    stager.delete_backup()?;
    tracing::info!("update finished");
    Ok(())
}
