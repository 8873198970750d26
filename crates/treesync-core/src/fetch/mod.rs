//! HTTP capability handed to the normalizer and the stager.
//!
//! Neither component builds its own client; they take any `Fetcher`. The
//! production implementation is [`CurlFetcher`]; tests use in-memory stubs.

mod http;

pub use http::CurlFetcher;

use crate::error::{Error, Result};

/// How much of the response the caller needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Stop after the final response's headers (redirect probes).
    HeadersOnly,
    /// Read the whole body into memory.
    Full,
}

/// Outcome of one GET after redirects have been followed.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Status of the terminal response.
    pub status: u32,
    /// URL of the terminal request, after following redirects.
    pub effective_url: String,
    /// Response body; empty for `FetchMode::HeadersOnly`.
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into `Error::FetchFailed` for `url`.
    pub fn error_for_status(self, url: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::FetchFailed {
                url: url.to_string(),
                status: self.status,
            })
        }
    }
}

/// Issues a GET, following redirects. Transport failures map to
/// `Error::Network`; the status code is returned untouched so callers decide
/// what counts as failure.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, mode: FetchMode) -> Result<FetchResponse>;
}

impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    fn fetch(&self, url: &str, mode: FetchMode) -> Result<FetchResponse> {
        (**self).fetch(url, mode)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str, mode: FetchMode) -> Result<FetchResponse> {
        (**self).fetch(url, mode)
    }
}
