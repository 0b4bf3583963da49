use thiserror::Error;

/// Failure to obtain a queryable document. Always fatal to the current fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("received non-success status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not read document body from {url}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Strict `MMDD` decode failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateFormatError {
    #[error("invalid date format: {0:?}, expected MMDD")]
    Length(String),

    #[error("invalid month in {0:?}")]
    Month(String),

    #[error("invalid day in {0:?}")]
    Day(String),
}
