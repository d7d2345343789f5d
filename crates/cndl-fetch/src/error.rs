use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::client::ClientSettingError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build client: {source}")]
    ClientBuild {
        #[from]
        source: ClientSettingError,
    },

    #[error("request to {url} failed with status {status}")]
    UpstreamRequestFailed { url: Url, status: StatusCode },

    #[error("redirect from {url} (status {status}) has no location")]
    MissingRedirectTarget { url: Url, status: StatusCode },

    #[error("redirect from {url} has an invalid location '{location}': {source}")]
    InvalidLocation {
        url: Url,
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("redirect from {url} (status {status}) has a non-ascii location: {source}")]
    InvalidLocationHeader {
        url: Url,
        status: StatusCode,
        #[source]
        source: reqwest::header::ToStrError,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read response body: {0}")]
    Read(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;
