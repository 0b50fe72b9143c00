//! drivemirror gdrive - Google Drive v3 client
//!
//! Provides async access to the subset of the Drive API that the mirror
//! needs:
//! - Listing folder children with server-side name and type filters
//! - Folder creation and multipart file creation
//! - In-place content replacement
//! - Media download
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP client for Drive endpoints
//! - [`provider`] - [`IRemoteStore`](drivemirror_core::ports::IRemoteStore) adapter
//! - [`query`] - Builders for Drive `q` search expressions

pub mod client;
pub mod provider;
pub mod query;

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when communicating with the Drive API
#[derive(Debug, Error)]
pub enum DriveError {
    /// The access token is missing, invalid or expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Insufficient permissions, or a per-user quota was exceeded
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested file or folder does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests {
        /// Value of the `Retry-After` header, if the server sent one
        retry_after: Option<Duration>,
    },

    /// A server-side error occurred (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success status
    #[error("Unexpected status {status}: {message}")]
    Unexpected { status: u16, message: String },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DriveError {
    /// Classifies a non-success response
    ///
    /// `message` is the response body, usually a Drive JSON error object.
    pub fn from_status(status: StatusCode, retry_after: Option<Duration>, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Self::TooManyRequests { retry_after },
            s if s.is_server_error() => Self::ServerError {
                status: s.as_u16(),
                message,
            },
            s => Self::Unexpected {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// Returns true for failures that may succeed if the caller tries again later
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::TooManyRequests { .. } | Self::ServerError { .. } | Self::NetworkError(_)
        )
    }
}
