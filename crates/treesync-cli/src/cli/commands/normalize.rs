//! `treesync normalize <url>` – print the canonical build link.

use anyhow::{Context, Result};
use treesync_core::config::TreesyncConfig;
use treesync_core::fetch::CurlFetcher;
use treesync_core::url_model::UrlNormalizer;

pub async fn run_normalize(cfg: &TreesyncConfig, url: &str) -> Result<()> {
    let normalizer = UrlNormalizer::new(CurlFetcher::new(&cfg.http));
    let raw = url.to_string();
    let canonical = tokio::task::spawn_blocking(move || {
        normalizer.normalize(&raw, |reason, fetch| {
            eprintln!("{}...", reason);
            fetch()
        })
    })
    .await
    .context("normalize task join")?
    .with_context(|| format!("normalize {}", url))?;
    println!("{}", canonical);
    Ok(())
}
