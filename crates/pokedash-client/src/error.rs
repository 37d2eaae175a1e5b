use std::sync::Arc;

use http::StatusCode;
use pokedash_common::StorageError;

use crate::URL_ENV;

/// Errors that can happen either during client configuration or while communicating over the network.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The client was configured incorrectly.
    #[error("invalid configuration: {0}")]
    Configuration(&'static str),

    /// Automatic environment inference did not work.
    #[error("environment not inferrable: {URL_ENV} is not set")]
    EnvironmentNotInferrable,

    /// A network problem.
    #[error("network error: {0}")]
    Network(anyhow::Error),

    /// The server answered with a non-success status.
    ///
    /// The body is passed along verbatim for the caller to present.
    #[error("server responded {status}: {body}")]
    Status {
        /// The response status.
        status: StatusCode,
        /// The raw response body.
        body: String,
    },

    /// A response body could not be decoded.
    #[error("encoding error: {0}")]
    Codec(anyhow::Error),

    /// The session storage failed.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    /// A rejected request could not be recovered because refreshing the access token failed.
    ///
    /// The session has been ended when this is returned.
    #[error("token refresh failed: {0}")]
    RefreshFailed(Arc<Error>),

    /// No refresh token is stored, so the access token cannot be renewed.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// The session was ended while the request was in flight.
    #[error("session ended")]
    SessionEnded,

    /// Other type of unclassified error.
    #[error("unclassified error: {0}")]
    Unclassified(anyhow::Error),
}

impl Error {
    /// The HTTP status the server answered with, if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RefreshFailed(err) => err.status(),
            _ => None,
        }
    }

    /// Whether the server rejected the request as unauthenticated.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    /// Whether this error ended the session, so the user has to log in again.
    pub fn is_session_ended(&self) -> bool {
        matches!(self, Self::RefreshFailed(_) | Self::SessionEnded)
    }
}

pub(crate) fn unclassified(err: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::Unclassified(anyhow::Error::from(err))
}

pub(crate) fn network(err: reqwest::Error) -> Error {
    Error::Network(anyhow::Error::from(err))
}

pub(crate) fn codec(err: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::Codec(anyhow::Error::from(err))
}
