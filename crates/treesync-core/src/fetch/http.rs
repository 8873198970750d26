//! libcurl-backed `Fetcher`.
//!
//! Blocking: each call runs a curl easy handle on the current thread. Call
//! from `spawn_blocking` if used from async code.

use std::str;
use std::time::Duration;

use super::{FetchMode, FetchResponse, Fetcher};
use crate::config::HttpConfig;
use crate::error::{Error, Result};

/// Fetcher that follows redirects and reports the terminal URL.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
    max_redirections: u32,
    user_agent: Option<String>,
}

impl CurlFetcher {
    pub fn new(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            max_redirections: cfg.max_redirections,
            user_agent: cfg.user_agent.clone(),
        }
    }

    fn configure(
        &self,
        easy: &mut curl::easy::Easy,
        url: &str,
    ) -> std::result::Result<(), curl::Error> {
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }
        Ok(())
    }
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, mode: FetchMode) -> Result<FetchResponse> {
        let network = |e: curl::Error| Error::Network {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url).map_err(network)?;

        let mut body: Vec<u8> = Vec::new();
        let mut cut_short = false;
        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    if mode == FetchMode::HeadersOnly {
                        // Returning less than `data.len()` aborts with a write error.
                        cut_short = true;
                        return Ok(0);
                    }
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(network)?;
            transfer.perform()
        };

        match performed {
            Ok(()) => {}
            Err(e) if cut_short && e.is_write_error() => {
                tracing::trace!(url, "headers received, body skipped");
            }
            Err(e) => return Err(network(e)),
        }

        let status = easy.response_code().map_err(network)?;
        let effective_url = easy
            .effective_url()
            .map_err(network)?
            .unwrap_or(url)
            .to_string();

        tracing::debug!(url, status, effective_url = %effective_url, ?mode, "fetched");
        Ok(FetchResponse {
            status,
            effective_url,
            body,
        })
    }
}
