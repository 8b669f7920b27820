//! Response envelope shared by every endpoint.

use serde::Deserialize;

use super::{ApiError, lenient};

/// `{ success, data, message }`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default, deserialize_with = "lenient::flag")]
    success: Option<bool>,

    data: Option<T>,

    #[serde(default)]
    message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, treating an explicit `success: false` as a failure.
    pub(crate) fn into_data(self, what: &'static str) -> Result<T, ApiError> {
        if self.success == Some(false) {
            return Err(ApiError::Unsuccessful(
                self.message.unwrap_or_else(|| "no message".to_string()),
            ));
        }

        self.data.ok_or(ApiError::MissingData(what))
    }
}
