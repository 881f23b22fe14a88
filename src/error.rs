use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Everything that can go wrong between reading the source URL and the
/// media tool exiting.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no video URL provided")]
    EmptyUrl,

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("master playlist {url} lists no variant playlist")]
    NoVariant { url: String },

    #[error("could not resolve a playable stream from {url}")]
    Unresolved { url: String },

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start {program}: {source}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    ProcessFailed { command: String, status: ExitStatus },
}

pub type Result<T> = std::result::Result<T, DownloadError>;
