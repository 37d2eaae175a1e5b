//! `pokedash-common` defines the session storage, access token claims and route guard
//! shared by the pokedash client and its front ends.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access_token;
pub mod guard;
pub mod session;
pub mod storage;

/// Path of the login entry point that unauthenticated navigation is redirected to.
pub const LOGIN_PATH: &str = "/login";

/// Errors produced by token storage backends.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum StorageError {
    /// The backing medium could not be read or written.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored data could not be encoded or decoded.
    #[error("storage encoding error: {0}")]
    Codec(#[from] serde_json::Error),
}
