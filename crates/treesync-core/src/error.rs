//! Error type shared by the normalizer and the stager.

use std::path::PathBuf;

/// Errors surfaced by treesync operations. Nothing is retried; every variant
/// aborts the enclosing operation and is handed back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input: a redirect wrapper without its query parameter, a
    /// tree page without the embedded document, a redirect loop.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    FetchFailed { url: String, status: u32 },

    /// Transport-level failure (DNS, connect, timeout, TLS).
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    /// Staging operation called on a stager that writes straight to live paths.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The extracted tree document is not valid JSON for the fields we read.
    #[error("tree document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Attach a path to a bare `io::Result`, the way `anyhow::Context` would.
pub(crate) trait IoContext<T> {
    fn at_path(self, path: &std::path::Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at_path(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| Error::io(path, e))
    }
}
