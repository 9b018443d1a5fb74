use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Failure of a single HTTP fetch
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Everything that can go wrong while mirroring a page.
///
/// Variants for which [`is_recoverable`](Self::is_recoverable) holds are
/// recovered by the runner: they are reported to the sink and the affected
/// tags keep their original reference. All other variants abort the run.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("malformed url `{0}`: no host to derive a name from")]
    MalformedUrl(String),
    #[error("cannot resolve output directory: {0}")]
    OutputDir(#[source] std::io::Error),
    #[error("failed to fetch page {url}: {source}")]
    PageFetchFailed {
        url: Url,
        #[source]
        source: FetchError,
    },
    #[error("failed to fetch resource {url}: {source}")]
    ResourceFetchFailed {
        url: Url,
        #[source]
        source: FetchError,
    },
    #[error("failed to write resource {path:?}: {source}")]
    ResourceWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write page {path:?}: {source}")]
    PageWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("html processing failed: {0}")]
    Document(String),
    #[error("download worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl MirrorError {
    /// Whether the run can continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MirrorError::ResourceFetchFailed { .. }
                | MirrorError::ResourceWriteFailed { .. }
                | MirrorError::Worker(_)
        )
    }
}
