//! Error types for the dashboard client

use thiserror::Error;

use crate::geolocation::GeolocationError;

pub type ClientResult<T> = Result<T, ClientError>;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy answered with a failure envelope or a non-2xx status
    #[error("{code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

impl ClientError {
    /// Whether another attempt could succeed.
    ///
    /// Input the proxy rejected (HTTP 400) is never retried; neither are
    /// malformed payloads or device position failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(e) => {
                e.is_timeout() || e.is_connect() || !(e.is_builder() || e.is_request())
            }
            ClientError::Api { status, .. } => *status != 400,
            ClientError::Decode(_) | ClientError::Geolocation(_) => false,
        }
    }

    /// Wire error code, when the proxy supplied one
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}
