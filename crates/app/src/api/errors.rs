//! Commerce API errors.

use thiserror::Error;

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,

        /// Response body, for diagnostics
        body: String,
    },

    /// The backend answered but flagged the request as unsuccessful.
    #[error("request was not successful: {0}")]
    Unsuccessful(String),

    /// The response body lacked a required section.
    #[error("response is missing {0}")]
    MissingData(&'static str),
}
