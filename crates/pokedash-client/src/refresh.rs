//! Access token renewal.
//!
//! At most one refresh call is in flight per client. Requests that are rejected while a
//! refresh is running wait for its outcome instead of starting their own.

use std::sync::Arc;

use futures_util::{
    future::{BoxFuture, Shared},
    FutureExt,
};

use crate::{
    error,
    model::{AuthResponse, RefreshRequest},
    read_json, ClientState, Error,
};

type SharedRefresh = Shared<BoxFuture<'static, Result<String, Arc<Error>>>>;

#[derive(Default)]
pub(crate) struct RefreshCoordinator {
    in_flight: tokio::sync::Mutex<Option<SharedRefresh>>,
}

/// Obtain an access token to replace `rejected`, which the server refused.
///
/// If the stored token has already moved on from `rejected`, that token is returned without
/// another refresh call. If it has been removed, the session was ended in the meantime.
pub(crate) async fn renew_access_token(
    state: &Arc<ClientState>,
    rejected: Option<&str>,
) -> Result<String, Error> {
    let refresh = {
        let mut in_flight = state.refresh.in_flight.lock().await;

        match in_flight.as_ref() {
            // a completed refresh holds a stale outcome
            Some(refresh) if refresh.peek().is_none() => refresh.clone(),
            _ => {
                match (rejected, state.session.access_token()?) {
                    (Some(rejected), Some(current)) if current != rejected => {
                        tracing::debug!("access token was renewed concurrently");
                        return Ok(current);
                    }
                    (Some(_), None) => return Err(Error::SessionEnded),
                    _ => {}
                }

                let refresh = refresh_session(state.clone()).boxed().shared();
                *in_flight = Some(refresh.clone());
                refresh
            }
        }
    };

    refresh.await.map_err(Error::RefreshFailed)
}

/// Refresh the session, ending it on failure.
async fn refresh_session(state: Arc<ClientState>) -> Result<String, Arc<Error>> {
    match request_token_grant(&state).await {
        Ok(token) => {
            tracing::info!("access token refreshed");
            Ok(token)
        }
        Err(err) => {
            tracing::warn!(%err, "access token refresh failed, ending session");

            if let Err(err) = state.session.clear_tokens() {
                tracing::error!(?err, "could not clear session tokens");
            }
            state.navigator.redirect(&state.endpoints.login_page);

            Err(Arc::new(err))
        }
    }
}

async fn request_token_grant(state: &ClientState) -> Result<String, Error> {
    let refresh_token = state
        .session
        .refresh_token()?
        .ok_or(Error::MissingRefreshToken)?;

    let response = state
        .http
        .post(state.url(&state.endpoints.refresh))
        .json(&RefreshRequest {
            refresh_token: &refresh_token,
        })
        .send()
        .await
        .map_err(error::network)?;

    let grant: AuthResponse = read_json(response).await?;

    // storage first, the caller attaches the returned token afterwards
    state.session.store_access_token(&grant.token)?;
    if let Some(rotated) = &grant.refresh_token {
        state.session.store_refresh_token(rotated)?;
    }

    Ok(grant.token)
}
