use crate::{
    model::{AuthResponse, Credentials, NewPokemon, Pokemon, Registration},
    ApiRequest, Client, Error,
};

impl Client {
    /// Log in, storing the issued tokens in the session.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, Error> {
        let request = ApiRequest::post(self.state.endpoints.login.clone())
            .json(credentials)?
            .without_refresh();

        self.start_session(request, &credentials.username).await
    }

    /// Register a new account, storing the issued tokens in the session.
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, Error> {
        let request = ApiRequest::post(self.state.endpoints.register.clone())
            .json(registration)?
            .without_refresh();

        self.start_session(request, &registration.username).await
    }

    /// End the session.
    ///
    /// The server is notified on a best-effort basis. The local session is cleared even when
    /// that fails.
    pub async fn logout(&self) -> Result<(), Error> {
        let request = ApiRequest::post(self.state.endpoints.logout.clone()).without_refresh();
        let result = self.send::<serde_json::Value>(request).await;

        self.state.session.clear()?;

        match result {
            Ok(_) => tracing::info!("logged out"),
            Err(err) => tracing::warn!(%err, "logout request failed, session cleared locally"),
        }
        Ok(())
    }

    /// List all pokemons.
    pub async fn pokemons(&self) -> Result<Vec<Pokemon>, Error> {
        self.send(ApiRequest::get(self.state.endpoints.pokemons.clone()))
            .await
    }

    /// Add a pokemon, returning the stored record.
    pub async fn add_pokemon(&self, pokemon: &NewPokemon) -> Result<Pokemon, Error> {
        self.send(ApiRequest::post(self.state.endpoints.pokemons.clone()).json(pokemon)?)
            .await
    }

    async fn start_session(
        &self,
        request: ApiRequest,
        username: &str,
    ) -> Result<AuthResponse, Error> {
        let response: AuthResponse = self.send(request).await?;

        self.state
            .session
            .store_login(&response.clone().into_session_data(username))?;
        tracing::info!(username, "session started");

        Ok(response)
    }
}
