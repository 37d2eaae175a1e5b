use std::{borrow::Cow, sync::Arc, time::Duration};

use pokedash_common::{
    session::Session,
    storage::{FileStorage, TokenStorage},
    LOGIN_PATH,
};

use crate::{
    error, navigator::LogNavigator, refresh::RefreshCoordinator, Client, ClientState, Error,
    Navigator, SESSION_FILE_ENV, URL_ENV,
};

const DEFAULT_USER_AGENT: &str = concat!("pokedash-client/", env!("CARGO_PKG_VERSION"));

/// Paths of the REST endpoints the client talks to, relative to the base URL.
#[derive(Clone, Debug)]
pub struct Endpoints {
    /// Exchanges credentials for a session.
    pub login: Cow<'static, str>,

    /// Creates an account and a session.
    pub register: Cow<'static, str>,

    /// Exchanges a refresh token for a new access token.
    pub refresh: Cow<'static, str>,

    /// Ends the session on the server.
    pub logout: Cow<'static, str>,

    /// The pokemon collection.
    pub pokemons: Cow<'static, str>,

    /// The login entry point users are redirected to when their session ends.
    pub login_page: Cow<'static, str>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: Cow::Borrowed("/auth/login"),
            register: Cow::Borrowed("/auth/register"),
            refresh: Cow::Borrowed("/auth/refresh"),
            logout: Cow::Borrowed("/auth/logout"),
            pokemons: Cow::Borrowed("/pokemons"),
            login_page: Cow::Borrowed(LOGIN_PATH),
        }
    }
}

/// A builder for configuring a [Client].
pub struct ClientBuilder {
    url: Option<Cow<'static, str>>,
    session: Option<Session>,
    navigator: Arc<dyn Navigator>,
    endpoints: Endpoints,
    timeout: Option<Duration>,
    user_agent: Cow<'static, str>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// A builder with in-memory session storage and a navigator that only logs.
    pub fn new() -> Self {
        Self {
            url: None,
            session: None,
            navigator: Arc::new(LogNavigator),
            endpoints: Endpoints::default(),
            timeout: None,
            user_agent: Cow::Borrowed(DEFAULT_USER_AGENT),
        }
    }

    /// Infer the configuration from the environment.
    ///
    /// The base URL is read from `POKEDASH_URL`. When `POKEDASH_SESSION_FILE` is set, the
    /// session is persisted in that file.
    pub fn from_environment(mut self) -> Result<Self, Error> {
        let url = std::env::var(URL_ENV).map_err(|_| Error::EnvironmentNotInferrable)?;
        self.url = Some(url.into());

        if let Some(path) = std::env::var_os(SESSION_FILE_ENV) {
            self = self.with_storage(Arc::new(FileStorage::new(path)));
        }

        Ok(self)
    }

    /// Set the API base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into().into());
        self
    }

    /// Use an existing session, shared with other components such as a route guard.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Keep the session in the given storage.
    pub fn with_storage(self, storage: Arc<dyn TokenStorage>) -> Self {
        self.with_session(Session::new(storage))
    }

    /// Set the navigator receiving the redirect when a session ends.
    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Arc::new(navigator);
        self
    }

    /// Override endpoint paths.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set a timeout for each network request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the user agent (default is `pokedash-client/<version>`).
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into().into();
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client, Error> {
        let url = self
            .url
            .ok_or(Error::Configuration("base url is required"))?;
        let base_url = url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Configuration("base url is empty"));
        }

        let mut http = reqwest::ClientBuilder::new().user_agent(self.user_agent.into_owned());
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(error::unclassified)?;

        Ok(Client {
            state: Arc::new(ClientState {
                http,
                base_url,
                session: self.session.unwrap_or_default(),
                navigator: self.navigator,
                endpoints: self.endpoints,
                refresh: RefreshCoordinator::default(),
            }),
        })
    }
}
