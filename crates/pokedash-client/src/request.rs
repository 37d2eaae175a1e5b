//! Logical API requests.

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;

use crate::{error, Error};

/// One logical request to the API.
///
/// A logical request may be dispatched over the network more than once: after a
/// `401 Unauthorized` it is re-sent exactly once with a refreshed access token.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) headers: HeaderMap,
    pub(crate) refreshable: bool,
    pub(crate) retried: bool,
}

impl ApiRequest {
    /// A request with the given method to a path relative to the API base URL.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            refreshable: true,
            retried: false,
        }
    }

    /// A `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body).map_err(error::codec)?);
        Ok(self)
    }

    /// Attach an extra header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Never try to refresh the access token when this request is rejected as unauthorized.
    ///
    /// Used for the authentication endpoints themselves, where a 401 means bad credentials.
    pub fn without_refresh(mut self) -> Self {
        self.refreshable = false;
        self
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this request has already been re-sent after a refresh.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn may_refresh(&self) -> bool {
        self.refreshable && !self.retried
    }
}
