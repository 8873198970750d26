//! Build link normalization.
//!
//! Turns whatever a user pasted (a search-engine redirect, a shortened link,
//! a link with no scheme) into a direct link to the builder/planner site.
//! Shortened links are resolved with a headers-only GET through the injected
//! `Fetcher`; the caller can wrap each probe, e.g. to show a spinner.

mod completion;
mod query;

pub use completion::CompletionTable;
pub use query::{extract_query_param, strip_whitespace, url_decode};

use regex::Regex;

use crate::error::{Error, Result};
use crate::fetch::{FetchMode, FetchResponse, Fetcher};

/// Hosts whose links are only redirects to the real build link.
pub const SHORTENER_HOSTS: &[&str] = &["tinyurl.com", "poeurl.com", "goo.gl"];

/// Search-engine redirect wrapper; the real link is in the `q` parameter.
const SEARCH_REDIRECT_HOST: &str = "google.com";
const SEARCH_REDIRECT_PARAM: &str = "q";

/// Upper bound on unwrap/resolve iterations for one link.
pub const MAX_REDIRECT_HOPS: usize = 16;

/// Message passed to the probe wrapper while a shortened link is resolved.
pub const RESOLVING_MESSAGE: &str = "Resolving shortened tree address";

const POEURL_REDIRECT: &str = "http://poeurl.com/redirect.php?url=";

/// Deferred redirect probe handed to a wrapper; calling it performs the GET.
pub type PendingFetch<'a> = dyn FnMut() -> Result<FetchResponse> + 'a;

/// Resolves redirect wrappers and shortened links into canonical build links.
pub struct UrlNormalizer<F> {
    fetcher: F,
    completions: CompletionTable,
    poeurl: Regex,
}

impl<F: Fetcher> UrlNormalizer<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            completions: CompletionTable::new(),
            poeurl: Regex::new(r"https?://(?:www\.)?poeurl\.com/").expect("valid regex"),
        }
    }

    /// Normalizes `raw`, running every redirect probe through `wrap`.
    ///
    /// `wrap` receives a user-facing reason and the pending probe. It must call
    /// the probe (at most once) and return its result; it may do anything
    /// around that call.
    pub fn normalize<W>(&self, raw: &str, mut wrap: W) -> Result<String>
    where
        W: FnMut(&str, &mut PendingFetch<'_>) -> Result<FetchResponse>,
    {
        let mut url = strip_whitespace(raw);

        let mut hops = 0usize;
        loop {
            let needs_unwrap = url.contains(SEARCH_REDIRECT_HOST);
            let needs_probe = !needs_unwrap && is_shortened(&url);
            if !needs_unwrap && !needs_probe {
                break;
            }
            hops += 1;
            if hops > MAX_REDIRECT_HOPS {
                return Err(Error::InvalidInput(format!(
                    "too many redirect hops (>{}) resolving {}",
                    MAX_REDIRECT_HOPS, raw
                )));
            }
            url = if needs_unwrap {
                extract_query_param(&url, SEARCH_REDIRECT_PARAM)?
            } else {
                self.resolve_shortened(&url, &mut wrap)?
            };
            tracing::debug!(hop = hops, url = %url, "build link hop");
        }

        let decoded = url_decode(&url);
        Ok(self.completions.complete(&decoded))
    }

    /// Normalizes `raw` without decorating redirect probes.
    pub fn normalize_direct(&self, raw: &str) -> Result<String> {
        self.normalize(raw, |_, fetch| fetch())
    }

    /// One redirect hop: returns the URL the shortener points at.
    fn resolve_shortened<W>(&self, url: &str, wrap: &mut W) -> Result<String>
    where
        W: FnMut(&str, &mut PendingFetch<'_>) -> Result<FetchResponse>,
    {
        let probe_url = self.probe_url(url);
        let mut pending = || self.fetcher.fetch(&probe_url, FetchMode::HeadersOnly);
        let response = wrap(RESOLVING_MESSAGE, &mut pending)?.error_for_status(&probe_url)?;
        Ok(response.effective_url)
    }

    /// URL actually probed for a shortened link. poeurl.com only redirects
    /// through its `redirect.php` endpoint, and preview links are plain pages.
    fn probe_url(&self, url: &str) -> String {
        let url = self.completions.complete(url);
        if !self.poeurl.is_match(&url) {
            return url;
        }
        let url = url.replace("preview.", "");
        if url.contains("redirect.php") {
            url
        } else {
            self.poeurl.replace(&url, POEURL_REDIRECT).into_owned()
        }
    }
}

fn is_shortened(url: &str) -> bool {
    SHORTENER_HOSTS.iter().any(|host| url.contains(host))
}
