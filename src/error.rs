use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// A remote call failed. Callers log it and move on.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: Url,
        status: StatusCode,
    },

    #[error("invalid task URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;
