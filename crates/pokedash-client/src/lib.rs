//! `pokedash-client` is an asynchronous Rust client for the pokedash REST API.
//!
//! Every request goes through [Client::send], which attaches the stored access token as a
//! bearer credential. A request rejected with `401 Unauthorized` triggers one token refresh
//! and is then re-sent exactly once. When the refresh fails the session is ended and the
//! configured [Navigator] is told to redirect to the login entry point.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use http::{header::AUTHORIZATION, StatusCode};
use pokedash_common::session::Session;
use refresh::{renew_access_token, RefreshCoordinator};
use serde::de::DeserializeOwned;

pub use builder::{ClientBuilder, Endpoints};
pub use error::Error;
pub use navigator::{LogNavigator, Navigator};
pub use request::ApiRequest;

/// Request and response types of the pokedash API.
pub mod model;

mod api;
mod builder;
mod error;
mod navigator;
mod refresh;
mod request;

/// Environment variable holding the API base URL.
pub const URL_ENV: &str = "POKEDASH_URL";

/// Environment variable holding the path of the persistent session file.
pub const SESSION_FILE_ENV: &str = "POKEDASH_SESSION_FILE";

/// The pokedash client handle.
///
/// Cloning is cheap. All clones share the session, the HTTP connection pool and the
/// in-flight token refresh.
#[derive(Clone)]
pub struct Client {
    state: Arc<ClientState>,
}

pub(crate) struct ClientState {
    http: reqwest::Client,
    base_url: String,
    session: Session,
    navigator: Arc<dyn Navigator>,
    endpoints: Endpoints,
    refresh: RefreshCoordinator,
}

impl ClientState {
    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

impl Client {
    /// Construct a new builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The API base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.state.base_url
    }

    /// The session this client reads credentials from and writes them to.
    pub fn session(&self) -> &Session {
        &self.state.session
    }

    /// The configured endpoint paths.
    pub fn endpoints(&self) -> &Endpoints {
        &self.state.endpoints
    }

    /// Send a request and decode the JSON body of its successful response.
    ///
    /// The stored access token is attached without checking its expiry; the server decides
    /// whether it is still good. On `401 Unauthorized` the token is refreshed once and the
    /// request re-sent once, and whatever that second attempt yields is returned. Every other
    /// non-success status is returned as [Error::Status] untouched.
    pub async fn send<T: DeserializeOwned>(&self, mut request: ApiRequest) -> Result<T, Error> {
        let mut bearer = self.state.session.access_token()?;

        loop {
            let response = self.dispatch(&request, bearer.as_deref()).await?;

            if response.status() == StatusCode::UNAUTHORIZED && request.may_refresh() {
                request.retried = true;
                tracing::debug!(
                    path = %request.path,
                    "request unauthorized, renewing access token"
                );

                let renewed = renew_access_token(&self.state, bearer.as_deref()).await?;
                bearer = Some(renewed);
                continue;
            }

            return read_json(response).await;
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, Error> {
        let mut builder = self
            .state
            .http
            .request(request.method.clone(), self.state.url(&request.path))
            .headers(request.headers.clone());

        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            retried = request.retried,
            authenticated = bearer.is_some(),
            "dispatching request"
        );

        builder.send().await.map_err(error::network)
    }
}

/// Decode a successful response body as JSON. An empty body decodes as `null`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, Error> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(error::network)?;

    if !status.is_success() {
        return Err(Error::Status {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    let bytes: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
    serde_json::from_slice(bytes).map_err(error::codec)
}
